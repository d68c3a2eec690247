//! Asset resolution: can a sound reference be played at all?

use crate::models::SoundRef;

/// Answers whether a sound reference points at an existing asset.
///
/// Consulted by `bind`, `apply_to_selected`, `apply_to_all` and preview
/// before anything is mutated or played.
pub trait AssetResolver {
    /// True if `sound` names an existing, readable asset.
    fn exists(&self, sound: &SoundRef) -> bool;
}

/// Resolves sound references as filesystem paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetResolver;

impl AssetResolver for FsAssetResolver {
    fn exists(&self, sound: &SoundRef) -> bool {
        !sound.is_empty() && sound.as_path().is_file()
    }
}

impl<F> AssetResolver for F
where
    F: Fn(&SoundRef) -> bool,
{
    fn exists(&self, sound: &SoundRef) -> bool {
        self(sound)
    }
}
