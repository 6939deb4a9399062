/// 侧边栏菜单项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub title: &'static str,
    pub path: &'static str,
    /// 对应的命令行子命令，图片上传没有命令行入口
    pub command: Option<&'static str>,
}

pub const MENU_LABEL: &str = "Application";

pub static MENU: [Destination; 3] = [
    Destination {
        title: "Upload images",
        path: "/",
        command: None,
    },
    Destination {
        title: "Upload video",
        path: "/video",
        command: Some("upload-video"),
    },
    Destination {
        title: "Assets",
        path: "/asset",
        command: Some("assets"),
    },
];

impl Destination {
    /// 根路径只做精确匹配，其他按前缀匹配
    pub fn is_active(&self, current_path: &str) -> bool {
        if self.path == "/" {
            current_path == self.path
        } else {
            current_path.starts_with(self.path)
        }
    }
}

pub fn active_destination(current_path: &str) -> Option<&'static Destination> {
    MENU.iter().find(|d| d.is_active(current_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_only_matches_exactly() {
        assert_eq!(active_destination("/").unwrap().title, "Upload images");
        assert!(!MENU[0].is_active("/video"));
    }

    #[test]
    fn nested_paths_match_by_prefix() {
        assert_eq!(active_destination("/video").unwrap().title, "Upload video");
        assert_eq!(active_destination("/video/123").unwrap().title, "Upload video");
        assert_eq!(active_destination("/asset").unwrap().title, "Assets");
        assert!(active_destination("/settings").is_none());
    }
}
