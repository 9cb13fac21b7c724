pub mod chain;
pub mod driver;
pub mod error;
pub mod normalize;
pub mod page;
pub mod retry;
pub mod strategy;

pub use chain::{ExtractedStats, StrategyChain, FIELD_PRIORITY};
pub use driver::{HttpDriver, PageDriver};
pub use error::{AcquireError, AttemptError, BlockReason, DriverError, StrategyError};
pub use normalize::{labelled_token, normalize_count};
pub use page::{HtmlPage, PageElement, ProfilePage};
pub use retry::{acquire_stats, detect_block, RetryPolicy};
pub use strategy::{
    default_strategies, AriaLabel, EmbeddedData, ExtractionResult, ExtractionStrategy,
    LinkContext, Provenance, StructuralPosition,
};
