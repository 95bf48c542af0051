/// Object draw priority relative to the player character.
///
/// Objects are drawn in two passes: `Behind` before the character and
/// `Front` after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DrawPriority {
    #[default]
    Behind,
    Front,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_default_to_behind_the_character() {
        assert_eq!(DrawPriority::default(), DrawPriority::Behind);
        assert!(DrawPriority::Behind < DrawPriority::Front);
    }
}
