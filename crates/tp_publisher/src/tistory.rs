//! Tistory pages and the editor elements the publisher drives.

pub const HOME_URL: &str = "https://www.tistory.com/";
pub const LOGIN_URL: &str = "https://www.tistory.com/auth/login";

/// Present on every page once the account is signed in.
pub const PROFILE_LINK: &str = ".link_profile";

pub const KAKAO_LOGIN_LINK: &str = ".link_kakao_id";
pub const KAKAO_ID_INPUT: &str = "input[name='loginId']";
pub const KAKAO_PASSWORD_INPUT: &str = "input[name='password']";
pub const KAKAO_SUBMIT: &str = "button[type='submit']";

pub const EDITOR: &str = "#editor";
pub const TITLE_INPUT: &str = ".textarea_tit";
pub const HTML_MODE_BUTTON: &str = ".btn_html";
pub const HTML_EDITOR: &str = ".CodeMirror-scroll";

pub const CATEGORY_BUTTON: &str = ".btn_category";
pub const CATEGORY_ITEMS: &str = ".list_category li";

pub const TAG_INPUT: &str = ".wrap_tag";

pub const SAVE_BUTTON: &str = ".btn_save";
pub const CONFIRM_BUTTON: &str = ".btn_g.btn_confirm";
pub const COMPLETE_LAYER: &str = ".layer_complete";

pub fn write_url(blog_url: &str) -> String {
    format!("{}/manage/write/", blog_url.trim_end_matches('/'))
}
