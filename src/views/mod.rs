//! Server-rendered HTML fragments for the admin shell.

pub mod footer;
pub mod loading;
pub mod page;
pub mod stat_card;

pub use footer::Footer;
pub use loading::Loading;
pub use page::{index_page, stats_fragment, StatsDomain};
pub use stat_card::{StatCard, Trend};
