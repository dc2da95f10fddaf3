use crate::TripContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hashtag {
    Companion(String),
    Transport(String),
    Nature,
    City,
    NewArea,
    FamiliarArea,
}

/// Tags summarizing the trip request, in display order. Empty fields yield no tag.
pub fn hashtags(context: &TripContext) -> Vec<Hashtag> {
    let mut tags = Vec::with_capacity(4);

    if !context.companion.is_empty() {
        tags.push(Hashtag::Companion(context.companion.to_owned()));
    }

    if !context.transport.is_empty() {
        tags.push(Hashtag::Transport(context.transport.to_owned()));
    }

    match context.preferences.nature.as_str() {
        "" => {}
        "nature" => tags.push(Hashtag::Nature),
        _ => tags.push(Hashtag::City),
    }

    match context.preferences.new_places.as_str() {
        "" => {}
        "new" => tags.push(Hashtag::NewArea),
        _ => tags.push(Hashtag::FamiliarArea),
    }

    tags
}
