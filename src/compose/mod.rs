//! Frame composition: character frames, the sticker background and the overlays drawn on top.

/// Still and animated backgrounds plus their placement transform.
pub mod background;
/// Layer compositor producing the final RGBA frame.
pub mod compositor;
/// Character frame sources.
pub mod source;
