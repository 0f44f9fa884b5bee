//! Effects - side effects declared by the reducer

use crate::favorites::Favorites;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read the abilities dataset
    LoadAbilities,
    /// Read the moves dataset
    LoadMoves,
    /// Overwrite the persisted favorites with this set
    SaveFavorites { favorites: Favorites },
}
