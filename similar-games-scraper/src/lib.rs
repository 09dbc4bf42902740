pub mod browser;
pub mod error;
pub mod extract;
pub mod filter;
pub mod layout;
pub mod loader;
pub mod pipeline;
pub mod webdriver;

pub use browser::{BrowserLauncher, BrowserSession};
pub use error::{ExtractError, PageError};
pub use extract::extract;
pub use filter::SuggestionFilter;
pub use layout::{CatalogSite, PageLayout};
pub use loader::{LoadStrategy, LoadedPage, LoaderOptions, PageLoader};
pub use pipeline::{GameOutcome, ScrapePipeline};
pub use webdriver::{WebDriverLauncher, WebDriverSession};
