//! Post-process pass chain used when antialiasing is off.

/// A stage of the composed render path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Draws the scene without outline artifacts.
    Base,
    /// Draws the outline artifacts over the base image.
    Outline,
}

/// State the compositor plans a frame against.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassContext {
    /// Outline artifacts currently in the scene.
    pub active_outlines: usize,
}

/// Uniform interface for composed render passes.
pub trait Pass {
    /// Which stage this pass implements.
    fn kind(&self) -> PassKind;
    /// Whether the pass must run this frame.
    fn is_needed(&self, _context: &PassContext) -> bool {
        true
    }
}

struct BasePass;

impl Pass for BasePass {
    fn kind(&self) -> PassKind {
        PassKind::Base
    }
}

struct OutlinePass;

impl Pass for OutlinePass {
    fn kind(&self) -> PassKind {
        PassKind::Outline
    }

    fn is_needed(&self, context: &PassContext) -> bool {
        context.active_outlines > 0
    }
}

/// How a frame is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPath {
    /// Single scene draw, outlines included as ordinary scene members.
    Direct,
    /// Composed passes, in order.
    Composed(Vec<PassKind>),
}

impl RenderPath {
    /// Whether `pass` runs on this path. The direct path runs none.
    #[must_use]
    pub fn runs(&self, pass: PassKind) -> bool {
        match self {
            Self::Direct => false,
            Self::Composed(passes) => passes.contains(&pass),
        }
    }
}

/// Ordered pass chain: the base pass, then the outline pass.
pub struct Compositor {
    passes: Vec<Box<dyn Pass>>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.passes.iter().map(|p| p.kind()))
            .finish()
    }
}

impl Compositor {
    /// Base pass followed by the outline pass.
    #[must_use]
    pub fn new() -> Self {
        Self {
            passes: vec![Box::new(BasePass), Box::new(OutlinePass)],
        }
    }

    /// Passes to run for a frame; the outline pass is dropped when no
    /// outline is active.
    #[must_use]
    pub fn plan(&self, context: &PassContext) -> Vec<PassKind> {
        self.passes
            .iter()
            .filter(|p| p.is_needed(context))
            .map(|p| p.kind())
            .collect()
    }
}
