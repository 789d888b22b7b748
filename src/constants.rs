pub const IMAGE_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".PNG", ".JPG", ".JPEG"];

pub const LOGO_NAME: &str = "LOGO";
pub const LOGO_FALLBACK_URL: &str = "https://img.icons8.com/fluency/96/diamond.png";
pub const SLIDE_FALLBACK_URL: &str = "https://img.icons8.com/fluency/240/image-file.png";

pub const DURATION_ICON: &str = "⏱";

pub const PAGE_TITLE: &str = "FinBox Onboarding";
pub const HEADER_TEXT: &str = "Onboarding Plan";
pub const BRAND_BLUE: &str = "#194CFF";
pub const BRAND_DARK: &str = "#0A0A0A";
pub const VIEWPORT_HEIGHT: u32 = 800;          // Height of the embedding frame (px)
pub const AUTOPLAY_DELAY_MS: u32 = 3000;       // Time each card stays centered
pub const TRANSITION_SPEED_MS: u32 = 800;      // Coverflow transition duration

pub const SWIPER_CSS_URL: &str = "https://cdn.jsdelivr.net/npm/swiper@11/swiper-bundle.min.css";
pub const SWIPER_JS_URL: &str = "https://cdn.jsdelivr.net/npm/swiper@11/swiper-bundle.min.js";
pub const FONT_CSS_URL: &str = "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700;800&display=swap";

pub const LOG_FILE: &str = "login_log.csv";
pub const LOG_HEADER: [&str; 3] = ["Date", "Time", "User Email"];
pub const UNKNOWN_USER: &str = "Unknown/Local User";
pub const USER_ENV: &str = "AGENDA_USER_EMAIL";
pub const SHEET_TOKEN_ENV: &str = "AGENDA_SHEET_TOKEN";
pub const SHEET_TIMEOUT_SECS: u64 = 10;

pub const OUTPUT_FILE: &str = "agenda.html";
