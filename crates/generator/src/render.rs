use crate::fragment::Fragment;
use crate::registry::Registry;
use blockpress_core::Block;
use std::fmt;
use tracing::warn;

/// Why a block produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Discriminator has no `Block` variant
    Unrecognized,
    /// Known kind with nothing registered for it
    NoRenderer,
    /// Renderer declined the block
    Rejected,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::Unrecognized => "unrecognized block kind",
            SkipReason::NoRenderer => "no renderer registered",
            SkipReason::Rejected => "renderer rejected block",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    /// Index in the page's block list
    pub position: usize,
    pub kind: String,
    pub reason: SkipReason,
}

/// Output of one dispatch pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub fragments: Vec<Fragment>,
    pub skipped: Vec<SkippedBlock>,
}

impl Rendered {
    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    /// All fragments concatenated in order
    pub fn html(&self) -> String {
        self.fragments.iter().map(Fragment::as_str).collect()
    }
}

/// Render blocks in order, skipping any the registry cannot handle.
///
/// A skipped block is logged with its kind and position and leaves no trace
/// in the output; its siblings render as if it were absent.
pub fn render_blocks(registry: &Registry, blocks: &[Block]) -> Rendered {
    let mut rendered = Rendered::default();

    for (position, block) in blocks.iter().enumerate() {
        let outcome = registry
            .resolve(block)
            .and_then(|render| render(block).ok_or(SkipReason::Rejected));

        match outcome {
            Ok(fragment) => rendered.fragments.push(fragment),
            Err(reason) => {
                let kind = block.discriminator();
                warn!(kind, position, %reason, "Skipping block");
                rendered.skipped.push(SkippedBlock {
                    position,
                    kind: kind.to_string(),
                    reason,
                });
            }
        }
    }

    rendered
}
