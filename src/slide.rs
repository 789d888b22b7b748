use thiserror::Error;

use crate::agenda::AgendaItem;
use crate::asset::{AssetId, ResolveAsset, ResolvedAsset};
use crate::constants::DURATION_ICON;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub item: AgendaItem,
    pub image: ResolvedAsset,
    pub duration_label: String,
}

impl Slide {
    fn new(item: AgendaItem, image: ResolvedAsset, terminal: bool) -> Self {
        let duration_label = if terminal {
            item.duration().to_string()
        } else {
            format!("{} {}", DURATION_ICON, item.duration())
        };
        Self { item, image, duration_label }
    }
}

/// Builds one slide per agenda item, in order.
///
/// Slide images are looked up by 1-based position. The closing slide drops
/// the clock icon from its duration: that is any item flagged terminal, and
/// always the last item.
pub fn build_deck<R: ResolveAsset + ?Sized>(items: &[AgendaItem], resolver: &R) -> Result<Vec<Slide>, DeckError> {
    if items.is_empty() {
        return Err(DeckError::InvalidConfiguration("agenda has no items".to_string()));
    }

    let last = items.len() - 1;
    let slides = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let image = resolver.resolve(&AssetId::Slide(i + 1));
            Slide::new(item.clone(), image, item.is_terminal() || i == last)
        })
        .collect();

    Ok(slides)
}
