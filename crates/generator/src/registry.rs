use crate::components;
use crate::fragment::Fragment;
use crate::render::SkipReason;
use blockpress_core::{Block, BlockFields, BlockKind, Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Rendering capability for one block kind
///
/// Returns `None` when handed a block it cannot render.
pub type Renderer = Box<dyn Fn(&Block) -> Option<Fragment> + Send + Sync>;

/// Block kind to renderer table
///
/// Populated once at startup and read-only afterwards, so it can be shared
/// across concurrent requests without locking. Adding a block kind means
/// adding a variant to `Block` and registering its renderer here; the
/// dispatch loop never changes.
#[derive(Default)]
pub struct Registry {
    renderers: BTreeMap<BlockKind, Renderer>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in block component
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry.register_typed(components::render_hero)?;
        registry.register_typed(components::render_call_to_action)?;
        registry.register_typed(components::render_text)?;
        registry.register_typed(components::render_feature_grid)?;
        registry.register_typed(components::render_testimonial)?;
        Ok(registry)
    }

    /// Register a renderer for `kind`
    ///
    /// Registering the same kind twice is a configuration error.
    pub fn register<F>(&mut self, kind: BlockKind, renderer: F) -> Result<()>
    where
        F: Fn(&Block) -> Option<Fragment> + Send + Sync + 'static,
    {
        if self.renderers.contains_key(&kind) {
            return Err(Error::DuplicateRenderer(kind));
        }
        self.renderers.insert(kind, Box::new(renderer));
        Ok(())
    }

    /// Register a renderer that only ever sees its own kind's fields
    pub fn register_typed<T, F>(&mut self, render: F) -> Result<()>
    where
        T: BlockFields,
        F: Fn(&T) -> Fragment + Send + Sync + 'static,
    {
        self.register(T::KIND, move |block: &Block| {
            T::from_block(block).map(&render)
        })
    }

    pub fn lookup(&self, kind: BlockKind) -> Option<&Renderer> {
        self.renderers.get(&kind)
    }

    /// Look up by raw discriminator; unknown strings yield `None`
    pub fn lookup_discriminator(&self, discriminator: &str) -> Option<&Renderer> {
        discriminator
            .parse::<BlockKind>()
            .ok()
            .and_then(|kind| self.lookup(kind))
    }

    /// Renderer for `block`, or why there is none
    pub fn resolve(&self, block: &Block) -> std::result::Result<&Renderer, SkipReason> {
        let kind = block.kind().ok_or(SkipReason::Unrecognized)?;
        self.lookup(kind).ok_or(SkipReason::NoRenderer)
    }

    pub fn contains(&self, kind: BlockKind) -> bool {
        self.renderers.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.renderers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpress_core::HeroSection;

    fn hero(heading: &str) -> Block {
        Block::Hero(HeroSection {
            heading: heading.to_string(),
            subheading: None,
            background_image: None,
            cta_label: None,
            cta_url: None,
        })
    }

    #[test]
    fn test_builtin_registers_every_kind() {
        let registry = Registry::builtin().unwrap();
        assert_eq!(registry.len(), BlockKind::ALL.len());
        for kind in BlockKind::ALL {
            assert!(registry.contains(kind), "missing renderer for {}", kind);
        }
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = Registry::new();
        registry
            .register(BlockKind::Hero, |_| Some(Fragment::new("first")))
            .unwrap();

        let err = registry
            .register(BlockKind::Hero, |_| Some(Fragment::new("second")))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateRenderer(BlockKind::Hero)));
        assert!(err.to_string().contains("HeroSection"));

        // The first registration is untouched
        let render = registry.lookup(BlockKind::Hero).unwrap();
        assert_eq!(render(&hero("x")).unwrap().as_str(), "first");
    }

    #[test]
    fn test_duplicate_typed_registration_fails() {
        let mut registry = Registry::builtin().unwrap();
        let result = registry.register_typed(|h: &HeroSection| Fragment::new(h.heading.clone()));
        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_unknown_kind_is_none() {
        let registry = Registry::new();
        assert!(registry.lookup(BlockKind::Testimonial).is_none());

        let registry = Registry::builtin().unwrap();
        assert!(registry.lookup_discriminator("NewsletterSection").is_none());
        assert!(registry.lookup_discriminator("").is_none());
        assert!(registry.lookup_discriminator("HeroSection").is_some());
    }

    #[test]
    fn test_typed_renderer_rejects_other_kinds() {
        let mut registry = Registry::new();
        registry
            .register_typed(|h: &HeroSection| Fragment::new(h.heading.clone()))
            .unwrap();

        let render = registry.lookup(BlockKind::Hero).unwrap();
        assert_eq!(render(&hero("Big")).unwrap().as_str(), "Big");

        let other = Block::Unrecognized {
            kind: "HeroSection2".to_string(),
        };
        assert!(render(&other).is_none());
    }

    #[test]
    fn test_resolve_reasons() {
        let mut registry = Registry::new();
        registry
            .register_typed(|h: &HeroSection| Fragment::new(h.heading.clone()))
            .unwrap();

        assert!(registry.resolve(&hero("x")).is_ok());
        assert_eq!(
            registry
                .resolve(&Block::Unrecognized {
                    kind: "Nope".to_string()
                })
                .err(),
            Some(SkipReason::Unrecognized)
        );

        let empty = Registry::new();
        assert_eq!(
            empty.resolve(&hero("x")).err(),
            Some(SkipReason::NoRenderer)
        );
    }

    #[test]
    fn test_debug_lists_kinds() {
        let mut registry = Registry::new();
        registry
            .register(BlockKind::Text, |_| Some(Fragment::empty()))
            .unwrap();
        assert_eq!(format!("{:?}", registry), "{Text}");
    }
}
