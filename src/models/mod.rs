mod preview;

pub use preview::{AssetDetails, EnrichedAsset, PreviewResponse};
