/*!
 * Translation support shared by the pipeline's translate stage.
 *
 * - `cache`: per-run cache so each distinct text is translated once
 */

pub use self::cache::{CacheStats, TranslationCache};

pub mod cache;
