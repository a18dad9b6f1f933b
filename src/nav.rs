use crate::model::{Category, Franchise, FranchiseId};
use url::Url;

/// Informational pages linked from the header and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    About,
    Contact,
    Privacy,
    Terms,
    ApiDocs,
    Submit,
    Help,
    Community,
}

impl StaticPage {
    pub const COMPANY: [StaticPage; 4] = [Self::About, Self::Contact, Self::Privacy, Self::Terms];
    pub const RESOURCES: [StaticPage; 4] = [Self::ApiDocs, Self::Submit, Self::Help, Self::Community];

    pub fn path(self) -> &'static str {
        match self {
            Self::About => "/about",
            Self::Contact => "/contact",
            Self::Privacy => "/privacy",
            Self::Terms => "/terms",
            Self::ApiDocs => "/api-docs",
            Self::Submit => "/submit",
            Self::Help => "/help",
            Self::Community => "/community",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::About => "About Us",
            Self::Contact => "Contact",
            Self::Privacy => "Privacy Policy",
            Self::Terms => "Terms of Service",
            Self::ApiDocs => "API Documentation",
            Self::Submit => "Submit Franchise",
            Self::Help => "Help Center",
            Self::Community => "Community",
        }
    }
}

/// Site locations, as the web front end addresses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Category(Category),
    Franchise { slug: String },
    Search { query: String },
    Static(StaticPage),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Category(category) => format!("/{}", category.key()),
            Route::Franchise { slug } => format!("/franchise/{}", slug),
            Route::Search { query } => {
                let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
                format!("/search?q={}", encoded)
            }
            Route::Static(page) => page.path().to_string(),
        }
    }

    /// Absolute URL on the public site.
    pub fn url(&self, site: &Url) -> Option<Url> {
        site.join(self.path().trim_start_matches('/')).ok()
    }
}

/// A franchise tile was activated. With a callback the owner handles the
/// selection in place; without one the caller should navigate to the
/// returned canonical route.
pub fn select_franchise(
    franchise: &Franchise,
    on_select: Option<&mut dyn FnMut(&FranchiseId)>,
) -> Option<Route> {
    match on_select {
        Some(callback) => {
            callback(&franchise.id);
            None
        }
        None => Some(Route::Franchise {
            slug: franchise.slug_or_derived(),
        }),
    }
}
