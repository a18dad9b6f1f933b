use crate::model::{AffiliateLink, Platform};
use ratatui::style::Color;
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

/// How a marketplace button is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: Color,
}

impl PlatformConfig {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::AmazonUk => Self {
                name: "Amazon UK",
                icon: "🛒",
                color: Color::Rgb(249, 115, 22),
            },
            Platform::AmazonUs => Self {
                name: "Amazon US",
                icon: "🛒",
                color: Color::Rgb(234, 88, 12),
            },
            Platform::Spotify => Self {
                name: "Spotify",
                icon: "♫",
                color: Color::Rgb(34, 197, 94),
            },
            Platform::Itunes => Self {
                name: "iTunes",
                icon: "♫",
                color: Color::Rgb(31, 41, 55),
            },
            Platform::Steam => Self {
                name: "Steam",
                icon: "🎮",
                color: Color::Rgb(37, 99, 235),
            },
            Platform::Other => Self {
                name: "Buy Now",
                icon: "↗",
                color: Color::Rgb(71, 85, 105),
            },
        }
    }
}

pub fn currency_symbol(currency: Option<&str>) -> &'static str {
    match currency {
        Some("USD") => "$",
        Some("GBP") => "£",
        _ => "",
    }
}

/// `"$9.99"`, `"£12"`, or the bare number for other currencies. `None` when
/// there is no price to show.
pub fn price_badge(link: &AffiliateLink) -> Option<String> {
    let price = link.price.filter(|p| *p != 0.0)?;
    Some(format!(
        "{}{}",
        currency_symbol(link.currency.as_deref()),
        price
    ))
}

/// Structured record of an affiliate button activation.
#[derive(Debug, Clone, PartialEq)]
pub struct AffiliateClick {
    pub platform: &'static str,
    pub item_id: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

impl AffiliateClick {
    pub fn from_link(link: &AffiliateLink) -> Self {
        Self {
            platform: link.platform.tag(),
            item_id: link.item_id.as_ref().map(|id| id.to_string()),
            price: link.price,
            currency: link.currency.clone(),
        }
    }
}

/// Best-effort analytics. Implementations must not block or fail.
pub trait AnalyticsSink: Send + Sync {
    fn affiliate_click(&self, event: &AffiliateClick);
}

pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn affiliate_click(&self, _event: &AffiliateClick) {}
}

/// Emits events on the `analytics` tracing target.
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn affiliate_click(&self, event: &AffiliateClick) {
        tracing::info!(
            target: "analytics",
            event = "affiliate_click",
            platform = event.platform,
            item_id = event.item_id.as_deref().unwrap_or(""),
            price = event.price,
            currency = event.currency.as_deref().unwrap_or(""),
        );
    }
}

/// Hands a URL to something outside this process.
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Launches the desktop browser in a detached process. Nothing from this
/// session (cookies, referrer, window handle) is passed along.
pub struct SystemOpener {
    command: Option<String>,
}

impl SystemOpener {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    fn command_for(&self, url: &str) -> Command {
        if let Some(program) = &self.command {
            let mut cmd = Command::new(program);
            cmd.arg(url);
            return cmd;
        }
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl SystemOpener {
    /// Spawns the opener and reaps it on a background thread.
    fn launch(&self, url: &str) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
        let mut child = self
            .command_for(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(thread::spawn(move || {
            let status = child.wait();
            if let Err(e) = &status {
                tracing::warn!(error = %e, "browser launcher did not exit cleanly");
            }
            status
        }))
    }
}

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> io::Result<()> {
        self.launch(url).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Opened(String),
    NoUrl,
    Failed(String),
}

/// Button press: analytics first, then open the destination untouched.
pub fn activate(
    link: &AffiliateLink,
    analytics: &dyn AnalyticsSink,
    opener: &dyn LinkOpener,
) -> Activation {
    analytics.affiliate_click(&AffiliateClick::from_link(link));

    if link.url.is_empty() {
        return Activation::NoUrl;
    }
    match opener.open(&link.url) {
        Ok(()) => {
            tracing::info!(url = %link.url, "opened affiliate link");
            Activation::Opened(link.url.clone())
        }
        Err(e) => {
            tracing::warn!(url = %link.url, error = %e, "could not open affiliate link");
            Activation::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingOpener {
        pub opened: Mutex<Vec<String>>,
    }

    impl LinkOpener for RecordingOpener {
        fn open(&self, url: &str) -> io::Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct RecordingAnalytics {
        pub events: Mutex<Vec<AffiliateClick>>,
    }

    impl AnalyticsSink for RecordingAnalytics {
        fn affiliate_click(&self, event: &AffiliateClick) {
            self.events.lock().unwrap().push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{RecordingAnalytics, RecordingOpener};
    use super::*;
    use crate::model::Id;
    use proptest::prelude::*;

    fn link(platform: Platform, url: &str, price: Option<f64>, currency: Option<&str>) -> AffiliateLink {
        AffiliateLink {
            id: Id::new("l1"),
            item_id: Some(Id::new("item-9")),
            platform,
            url: url.to_string(),
            price,
            currency: currency.map(str::to_string),
        }
    }

    struct FailingOpener;

    impl LinkOpener for FailingOpener {
        fn open(&self, _url: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no browser"))
        }
    }

    #[test]
    fn test_platform_config_table() {
        assert_eq!(PlatformConfig::for_platform(Platform::AmazonUk).name, "Amazon UK");
        assert_eq!(PlatformConfig::for_platform(Platform::AmazonUs).name, "Amazon US");
        assert_eq!(PlatformConfig::for_platform(Platform::Spotify).name, "Spotify");
        assert_eq!(PlatformConfig::for_platform(Platform::Itunes).name, "iTunes");
        assert_eq!(PlatformConfig::for_platform(Platform::Steam).name, "Steam");
        assert_eq!(PlatformConfig::for_platform(Platform::Other).name, "Buy Now");
    }

    #[test]
    fn test_price_badge_formatting() {
        let usd = link(Platform::AmazonUs, "u", Some(9.99), Some("USD"));
        assert_eq!(price_badge(&usd).as_deref(), Some("$9.99"));

        let gbp = link(Platform::AmazonUk, "u", Some(9.99), Some("GBP"));
        assert_eq!(price_badge(&gbp).as_deref(), Some("£9.99"));

        let eur = link(Platform::Other, "u", Some(9.99), Some("EUR"));
        assert_eq!(price_badge(&eur).as_deref(), Some("9.99"));

        let none = link(Platform::Other, "u", Some(20.0), None);
        assert_eq!(price_badge(&none).as_deref(), Some("20"));

        let no_price = link(Platform::Steam, "u", None, Some("USD"));
        assert_eq!(price_badge(&no_price), None);
    }

    #[test]
    fn test_activate_emits_analytics_then_opens() {
        let analytics = RecordingAnalytics::default();
        let opener = RecordingOpener::default();
        let l = link(Platform::Spotify, "https://open.spotify.com/album/1", Some(4.5), Some("GBP"));

        let outcome = activate(&l, &analytics, &opener);

        assert_eq!(outcome, Activation::Opened("https://open.spotify.com/album/1".to_string()));
        let events = analytics.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].platform, "spotify");
        assert_eq!(events[0].item_id.as_deref(), Some("item-9"));
        assert_eq!(events[0].price, Some(4.5));
        assert_eq!(events[0].currency.as_deref(), Some("GBP"));
    }

    #[test]
    fn test_activate_with_noop_analytics() {
        let opener = RecordingOpener::default();
        let l = link(Platform::Steam, "https://store.steampowered.com/app/1", None, None);
        activate(&l, &NoopAnalytics, &opener);
        assert_eq!(opener.opened.lock().unwrap().as_slice(), ["https://store.steampowered.com/app/1"]);
    }

    #[test]
    fn test_activate_without_url_opens_nothing() {
        let opener = RecordingOpener::default();
        let l = link(Platform::Other, "", None, None);
        assert_eq!(activate(&l, &NoopAnalytics, &opener), Activation::NoUrl);
        assert!(opener.opened.lock().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_opener_reaps_launcher() {
        let opener = SystemOpener::new(Some("true".to_string()));
        let waiter = opener.launch("https://example.com").unwrap();
        let status = waiter.join().unwrap().unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_activate_reports_open_failure() {
        let l = link(Platform::Other, "https://example.com", None, None);
        assert!(matches!(activate(&l, &NoopAnalytics, &FailingOpener), Activation::Failed(_)));
    }

    proptest! {
        #[test]
        fn prop_activation_opens_url_verbatim(
            tag in prop::sample::select(vec!["amazon_uk", "amazon_us", "spotify", "itunes", "steam", "other"]),
            url in "https://[a-z]{1,12}\\.[a-z]{2,4}/[A-Za-z0-9_\\-?=&%]{0,40}",
        ) {
            let opener = RecordingOpener::default();
            let l = link(Platform::from_tag(tag), &url, None, None);
            activate(&l, &NoopAnalytics, &opener);
            let opened = opener.opened.lock().unwrap();
            prop_assert_eq!(opened.as_slice(), [url.clone()]);
        }

        #[test]
        fn prop_unknown_platform_uses_fallback(tag in "[a-z_]{0,16}") {
            prop_assume!(!["amazon_uk", "amazon_us", "spotify", "itunes", "steam"].contains(&tag.as_str()));
            let config = PlatformConfig::for_platform(Platform::from_tag(&tag));
            prop_assert_eq!(config, PlatformConfig::for_platform(Platform::Other));
        }
    }
}
