pub mod card;
pub mod credential;
pub mod dispatch;
pub mod field;
pub mod map_to_card;
pub mod name;
pub mod normalize;
pub mod overlay;
