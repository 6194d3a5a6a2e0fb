use crate::direction::Compass;
use serde::{Deserialize, Serialize};

/// Solid barrier that blocks movement and rays.
///
/// `Border` is never authored into a map; it is synthesized when a ray's
/// march would leave the map or when a cell lookup goes out of range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Normal,
    Border,
}

/// Solid barrier that reflects rays on the configured sides. Sides left off
/// behave as normal walls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mirror {
    pub sides: Compass,
}

impl Mirror {
    pub fn new(sides: Compass) -> Self {
        Mirror { sides }
    }

    /// Toggle sides on or off. Self-inverse: toggling the same sides twice
    /// restores the original configuration.
    pub fn toggle(&mut self, sides: Compass) {
        self.sides ^= sides;
    }

    /// Whether a ray entering through `side` gets reflected.
    pub fn reflects(&self, side: Compass) -> bool {
        self.sides.intersects(side)
    }
}

/// One end of a portal connection: the destination cell and the side of
/// that cell the link attaches to. Links are independently configured, so a
/// pair of portals need not be symmetric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalLink {
    pub cell: (i32, i32),
    pub side: Compass,
}

/// Semi-solid barrier that teleports rays and actors through linked sides.
/// All four side slots always exist; an unlinked side acts as a normal wall.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub active: bool,
    links: [Option<PortalLink>; 4],
}

impl Default for Portal {
    fn default() -> Self {
        Portal::new()
    }
}

impl Portal {
    pub fn new() -> Self {
        Portal {
            active: true,
            links: [None; 4],
        }
    }

    pub fn link(&self, side: Compass) -> Option<PortalLink> {
        self.links[side.index()]
    }

    pub fn set_link(&mut self, side: Compass, link: Option<PortalLink>) {
        self.links[side.index()] = link;
    }

    pub fn is_linked(&self, side: Compass) -> bool {
        self.links[side.index()].is_some()
    }

    pub fn has_links(&self) -> bool {
        self.links.iter().any(Option::is_some)
    }

    /// Compound direction of all linked sides.
    pub fn linked_sides(&self) -> Compass {
        Compass::CARDINALS
            .into_iter()
            .filter(|side| self.is_linked(*side))
            .fold(Compass::NONE, |acc, side| acc | side)
    }

    /// 3x3 sub-area indices for the linked sides, for map rendering.
    /// Requires at least one linked side.
    pub fn subrect_indices(&self) -> Vec<usize> {
        self.linked_sides().subrect_indices()
    }
}

/// The content of a map cell. Everything except `Empty` blocks movement;
/// portals additionally teleport on a clean entry from an empty cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Empty,
    Wall(Wall),
    Mirror(Mirror),
    Portal(Portal),
}

impl Default for Block {
    fn default() -> Self {
        Block::Empty
    }
}

impl Block {
    /// Single passability predicate used by both the ray marcher and the
    /// movement resolver.
    pub fn blocks_movement(&self) -> bool {
        !matches!(self, Block::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_toggle_involution() {
        let mut mirror = Mirror::new(Compass::UP | Compass::LEFT);
        let original = mirror.sides;
        mirror.toggle(Compass::LEFT | Compass::DOWN);
        assert_eq!(mirror.sides, Compass::UP | Compass::DOWN);
        mirror.toggle(Compass::LEFT | Compass::DOWN);
        assert_eq!(mirror.sides, original);
    }

    #[test]
    fn test_mirror_reflects() {
        let mirror = Mirror::new(Compass::UP);
        assert!(mirror.reflects(Compass::UP));
        assert!(!mirror.reflects(Compass::DOWN));
    }

    #[test]
    fn test_portal_links() {
        let mut portal = Portal::new();
        assert!(!portal.has_links());
        for side in Compass::CARDINALS {
            assert!(portal.link(side).is_none());
        }

        portal.set_link(
            Compass::UP,
            Some(PortalLink {
                cell: (5, 5),
                side: Compass::RIGHT,
            }),
        );
        assert!(portal.is_linked(Compass::UP));
        assert!(!portal.is_linked(Compass::DOWN));
        assert_eq!(portal.linked_sides(), Compass::UP);
        assert_eq!(portal.link(Compass::UP).unwrap().cell, (5, 5));
    }

    #[test]
    fn test_passability() {
        assert!(!Block::Empty.blocks_movement());
        assert!(Block::Wall(Wall::Normal).blocks_movement());
        assert!(Block::Mirror(Mirror::default()).blocks_movement());
        assert!(Block::Portal(Portal::new()).blocks_movement());
    }
}
