mod controller;

pub use controller::{
    FormPhase,
    FormStatus,
    SubmitOutcome,
    UploadFormController,
    UPLOAD_FALLBACK_MESSAGE,
    UPLOAD_SUCCESS_MESSAGE,
};
