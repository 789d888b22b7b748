use serde::{Deserialize, Serialize};

use crate::asset::ResolvedAsset;
use crate::constants::*;
use crate::slide::Slide;

/// Read-only presentation settings for one rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub title: String,
    pub header_text: String,
    pub brand_blue: String,
    pub brand_dark: String,
    pub viewport_height: u32,
    pub autoplay_delay_ms: u32,
    pub transition_speed_ms: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: PAGE_TITLE.to_string(),
            header_text: HEADER_TEXT.to_string(),
            brand_blue: BRAND_BLUE.to_string(),
            brand_dark: BRAND_DARK.to_string(),
            viewport_height: VIEWPORT_HEIGHT,
            autoplay_delay_ms: AUTOPLAY_DELAY_MS,
            transition_speed_ms: TRANSITION_SPEED_MS,
        }
    }
}

const CARD_STYLES: &str = r#"
    body {
        margin: 0; padding: 0;
        font-family: 'Inter', sans-serif;
        background-color: var(--fb-dark);
        background-image:
            radial-gradient(circle at 15% 50%, rgba(25, 76, 255, 0.08), transparent 25%),
            radial-gradient(circle at 85% 30%, rgba(25, 76, 255, 0.05), transparent 25%);
        color: var(--text-main);
        overflow: hidden;
        height: var(--viewport-height); width: 100vw;
        display: flex; flex-direction: column;
        align-items: center; justify-content: center;
    }

    .brand-header {
        position: absolute; top: 20px; left: 24px; z-index: 50;
        display: flex; align-items: center; gap: 12px;
    }
    .brand-logo-img { height: 32px; width: auto; object-fit: contain; }
    .header-text {
        font-size: 14px;
        color: rgba(255,255,255,0.6);
        border-left: 1px solid rgba(255,255,255,0.2);
        padding-left: 12px;
        white-space: nowrap;
    }

    .swiper { width: 100%; height: 100%; padding-top: 80px; padding-bottom: 40px; box-sizing: border-box; }
    .swiper-slide {
        width: 320px; height: 500px;
        transition: all 0.5s ease;
        opacity: 0.4; transform: scale(0.9);
        filter: blur(2px) grayscale(100%);
    }
    .swiper-slide-active {
        opacity: 1; transform: scale(1);
        filter: blur(0) grayscale(0%);
        z-index: 20;
    }

    .glass-card {
        width: 100%; height: 100%; border-radius: 24px;
        position: relative; background: var(--fb-card-bg);
        border: 1px solid var(--fb-border);
        backdrop-filter: blur(20px); -webkit-backdrop-filter: blur(20px);
        box-shadow: 0 15px 30px rgba(0,0,0,0.5);
        overflow: hidden; transition: all 0.4s ease;
    }
    .swiper-slide-active .glass-card {
        border-color: rgba(25, 76, 255, 0.5);
        box-shadow: 0 20px 50px rgba(0,0,0,0.6), 0 0 40px rgba(25, 76, 255, 0.15);
    }
    .glow-effect {
        position: absolute; top: -50%; left: -50%; width: 200%; height: 200%;
        background: radial-gradient(circle at 50% 50%, rgba(25, 76, 255, 0.15), transparent 60%);
        opacity: 0; transition: opacity 0.5s ease; pointer-events: none;
    }
    .swiper-slide-active .glow-effect { opacity: 1; }
    .card-content {
        position: relative; z-index: 2; height: 100%; padding: 24px;
        box-sizing: border-box; display: flex; flex-direction: column;
        justify-content: space-between;
    }

    .time-header { text-align: center; font-size: 22px; font-weight: 700; color: var(--fb-blue); margin-bottom: 5px; }
    .visual-container {
        flex: 1; display: flex; align-items: center; justify-content: center;
        margin: 5px 0; transform: scale(0.9); transition: transform 0.6s ease;
    }
    .visual-container img {
        max-width: 90%; max-height: 200px;
        object-fit: contain;
        filter: drop-shadow(0 15px 30px rgba(0,0,0,0.3));
    }
    .swiper-slide-active .visual-container { transform: scale(1.05); }
    .text-content { text-align: center; }
    h3 { margin: 0 0 8px 0; font-size: 20px; font-weight: 700; color: #fff; line-height: 1.2; }
    p { margin: 0 0 10px 0; font-size: 13px; line-height: 1.4; color: var(--text-muted); }
    .duration-footer {
        font-size: 12px;
        color: rgba(255, 255, 255, 0.5);
        font-weight: 600;
        padding-top: 8px;
        border-top: 1px solid rgba(255,255,255,0.1);
        display: inline-block; width: 100%;
    }

    .swiper-pagination { bottom: 15px !important; }
    .swiper-pagination-bullet { background: rgba(255,255,255,0.2); opacity: 1; width: 6px; height: 6px; }
    .swiper-pagination-bullet-active { background: var(--fb-blue); width: 24px; border-radius: 4px; }

    /* phones */
    @media (max-width: 480px) {
        .brand-header { top: 15px; left: 15px; gap: 8px; }
        .brand-logo-img { height: 24px; }
        .header-text { font-size: 12px; padding-left: 8px; }
        .swiper { padding-top: 60px; padding-bottom: 40px; }
        .swiper-slide { width: 260px; height: 420px; }
        .card-content { padding: 20px; }
        .time-header { font-size: 18px; }
        h3 { font-size: 18px; }
        p { font-size: 12px; }
        .visual-container img { max-height: 150px; }
    }

    /* tablets */
    @media (min-width: 481px) and (max-width: 1024px) {
        .swiper-slide { width: 300px; height: 460px; }
    }
"#;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_slide(out: &mut String, position: usize, slide: &Slide) {
    out.push_str(&format!(
        r#"
      <div class="swiper-slide">
        <div class="glass-card">
          <div class="glow-effect"></div>
          <div class="card-content">
            <div class="time-header">{time}</div>
            <div class="visual-container">
              <img src="{src}" alt="Slide {position}" />
            </div>
            <div class="text-content">
              <h3>{title}</h3>
              <p>{description}</p>
              <div class="duration-footer">{duration}</div>
            </div>
          </div>
        </div>
      </div>"#,
        time = escape_html(slide.item.time()),
        src = escape_html(&slide.image.src()),
        title = escape_html(slide.item.title()),
        description = escape_html(slide.item.description()),
        duration = escape_html(&slide.duration_label),
    ));
}

fn write_script(out: &mut String, page: &PageConfig) {
    out.push_str(&format!(
        r#"
  <script src="{SWIPER_JS_URL}"></script>
  <script>
    var swiper = new Swiper(".mySwiper", {{
      effect: "coverflow",
      grabCursor: true,
      centeredSlides: true,
      slidesPerView: "auto",
      loop: false,
      speed: {speed},
      autoplay: {{ delay: {delay}, disableOnInteraction: false, stopOnLastSlide: true }},
      coverflowEffect: {{ rotate: 0, stretch: 0, depth: 150, modifier: 1, slideShadows: false }},
      pagination: {{ el: ".swiper-pagination", clickable: true }},
    }});
  </script>"#,
        speed = page.transition_speed_ms,
        delay = page.autoplay_delay_ms,
    ));
}

/// Produces the complete, self-contained agenda page.
pub fn render_document(logo: &ResolvedAsset, slides: &[Slide], page: &PageConfig) -> String {
    let mut out = String::with_capacity(16 * 1024 + slides.iter().map(|s| s.image.payload.len()).sum::<usize>());

    out.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no">
  <title>{title}</title>
  <link rel="stylesheet" href="{SWIPER_CSS_URL}" />
  <link href="{FONT_CSS_URL}" rel="stylesheet">
  <style>
    :root {{
        --fb-blue: {blue};
        --fb-dark: {dark};
        --fb-card-bg: rgba(255, 255, 255, 0.03);
        --fb-border: rgba(255, 255, 255, 0.1);
        --text-main: #FFFFFF;
        --text-muted: #9CA3AF;
        --viewport-height: {height}px;
    }}
{CARD_STYLES}  </style>
</head>
<body>
  <div class="brand-header">
    <img src="{logo}" class="brand-logo-img" alt="Logo" />
    <div class="header-text">{header}</div>
  </div>

  <div class="swiper mySwiper">
    <div class="swiper-wrapper">"#,
        title = escape_html(&page.title),
        blue = escape_html(&page.brand_blue),
        dark = escape_html(&page.brand_dark),
        height = page.viewport_height,
        logo = escape_html(&logo.src()),
        header = escape_html(&page.header_text),
    ));

    for (i, slide) in slides.iter().enumerate() {
        write_slide(&mut out, i + 1, slide);
    }

    out.push_str(
        r#"
    </div>
    <div class="swiper-pagination"></div>
  </div>
"#,
    );
    write_script(&mut out, page);
    out.push_str("\n</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::{AgendaItem, default_agenda};
    use crate::asset::{AssetId, ResolveAsset};
    use crate::slide::build_deck;

    struct Placeholders;

    impl ResolveAsset for Placeholders {
        fn resolve(&self, id: &AssetId) -> ResolvedAsset {
            ResolvedAsset::fallback(&format!("https://example.test/{id}.png"))
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<b>"Q&A"</b>"#), "&lt;b&gt;&quot;Q&amp;A&quot;&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn renders_one_block_per_slide() {
        let deck = build_deck(&default_agenda(), &Placeholders).unwrap();
        let html = render_document(&Placeholders.resolve(&AssetId::logo()), &deck, &PageConfig::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches(r#"<div class="swiper-slide">"#).count(), 12);
        assert!(html.contains(r#"alt="Slide 12""#));
        assert!(html.contains("IT Setup &amp; Induction"));
        assert!(html.contains("⏱ 15 Min"));
        assert!(html.contains(r#"<div class="duration-footer">30 Min</div>"#));
        assert!(html.contains("stopOnLastSlide: true"));
        assert!(html.contains("https://example.test/LOGO.png"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn page_settings_flow_into_document() {
        let items = [AgendaItem::new("09:00", "5 Min", "<script>", "").unwrap()];
        let deck = build_deck(&items, &Placeholders).unwrap();
        let page = PageConfig {
            title: "Acme Day One".to_string(),
            viewport_height: 640,
            autoplay_delay_ms: 4500,
            ..PageConfig::default()
        };
        let html = render_document(&ResolvedAsset::fallback("logo.png"), &deck, &page);

        assert!(html.contains("<title>Acme Day One</title>"));
        assert!(html.contains("--viewport-height: 640px;"));
        assert!(html.contains("delay: 4500"));
        assert!(html.contains("<h3>&lt;script&gt;</h3>"));
        assert!(!html.contains("<h3><script>"));
    }
}
