use std::fmt;

use enum_map::Enum;
use ndarray::Array2;
use unnamed_entity::{EntityId, EntityIds, entity_id};

entity_id! {
    pub id ColId u16, reserve 1, delta;
    pub id RowId u16, reserve 1, delta;
}

/// Kind of a physical site.  Declaration order is the on-disk contract: the
/// `type` key of a site-data group is an index into this enum.
///
/// Compass convention: N is the top edge, S the bottom, W the left, E the
/// right.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Enum)]
pub enum SiteKind {
    Neutral,
    Clb,
    TermN,
    TermS,
    TermW,
    TermE,
    IoiN,
    IoiS,
    IoiW,
    IoiE,
    TermBramN,
    TermBramS,
    IoiBramN,
    IoiBramS,
    Bram,
    Global,
}

/// Position of a site within the subsequence of sites sharing its kind,
/// derived from a row-major sweep of the whole grid.  Not unique across
/// kinds.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct LocalCoord {
    pub x: u32,
    pub y: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct Site {
    pub kind: SiteKind,
    pub coord: LocalCoord,
}

impl Site {
    /// Canonical display name, 1-indexed on the local coordinate.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = self.coord.x + 1;
        let y = self.coord.y + 1;
        match self.kind {
            SiteKind::Clb => write!(f, "R{y}C{x}"),
            SiteKind::TermN => write!(f, "TTERMC{x}"),
            SiteKind::TermS => write!(f, "BTERMC{x}"),
            SiteKind::TermW => write!(f, "LTERMR{y}"),
            SiteKind::TermE => write!(f, "RTERMR{y}"),
            SiteKind::IoiN => write!(f, "TIOIC{x}"),
            SiteKind::IoiS => write!(f, "BIOIC{x}"),
            SiteKind::IoiW => write!(f, "LIOIR{y}"),
            SiteKind::IoiE => write!(f, "RIOIR{y}"),
            SiteKind::TermBramN => write!(f, "TTERMBRAMC{x}"),
            SiteKind::TermBramS => write!(f, "BTERMBRAMC{x}"),
            SiteKind::IoiBramN => write!(f, "TIOIBRAMC{x}"),
            SiteKind::IoiBramS => write!(f, "BIOIBRAMC{x}"),
            SiteKind::Bram => write!(f, "BRAMR{y}C{x}"),
            SiteKind::Neutral | SiteKind::Global => write!(f, "GLOBALR{y}C{x}"),
        }
    }
}

/// The fully classified site grid of one chip.  Built once by
/// [`crate::build::build_chip`]; read-only afterwards.
#[derive(Clone, Debug)]
pub struct Chip {
    sites: Array2<Site>,
}

impl Chip {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Chip {
            sites: Array2::from_elem(
                [height, width],
                Site {
                    kind: SiteKind::Neutral,
                    coord: LocalCoord::default(),
                },
            ),
        }
    }

    pub fn width(&self) -> usize {
        self.sites.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.sites.shape()[0]
    }

    pub fn cols(&self) -> EntityIds<ColId> {
        EntityIds::new(self.sites.shape()[1])
    }

    pub fn rows(&self) -> EntityIds<RowId> {
        EntityIds::new(self.sites.shape()[0])
    }

    pub fn site(&self, col: ColId, row: RowId) -> &Site {
        &self.sites[[row.to_idx(), col.to_idx()]]
    }

    pub(crate) fn site_mut(&mut self, col: ColId, row: RowId) -> &mut Site {
        &mut self.sites[[row.to_idx(), col.to_idx()]]
    }

    /// Row-major traversal: row outer, column inner.
    pub fn sites(&self) -> impl Iterator<Item = (ColId, RowId, &Site)> {
        self.sites
            .indexed_iter()
            .map(|((r, c), site)| (ColId::from_idx(c), RowId::from_idx(r), site))
    }

    pub fn print(&self, o: &mut dyn std::io::Write) -> std::io::Result<()> {
        for (col, row, site) in self.sites() {
            writeln!(o, "({col},{row}): {site}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(kind: SiteKind, x: u32, y: u32) -> String {
        Site {
            kind,
            coord: LocalCoord { x, y },
        }
        .name()
    }

    #[test]
    fn site_names() {
        assert_eq!(name(SiteKind::Clb, 2, 1), "R2C3");
        assert_eq!(name(SiteKind::TermN, 4, 0), "TTERMC5");
        assert_eq!(name(SiteKind::TermS, 4, 0), "BTERMC5");
        assert_eq!(name(SiteKind::TermW, 0, 7), "LTERMR8");
        assert_eq!(name(SiteKind::TermE, 0, 7), "RTERMR8");
        assert_eq!(name(SiteKind::IoiN, 3, 0), "TIOIC4");
        assert_eq!(name(SiteKind::IoiS, 3, 0), "BIOIC4");
        assert_eq!(name(SiteKind::IoiW, 0, 2), "LIOIR3");
        assert_eq!(name(SiteKind::IoiE, 0, 2), "RIOIR3");
        assert_eq!(name(SiteKind::TermBramN, 1, 0), "TTERMBRAMC2");
        assert_eq!(name(SiteKind::TermBramS, 1, 0), "BTERMBRAMC2");
        assert_eq!(name(SiteKind::IoiBramN, 1, 0), "TIOIBRAMC2");
        assert_eq!(name(SiteKind::IoiBramS, 1, 0), "BIOIBRAMC2");
        assert_eq!(name(SiteKind::Bram, 0, 3), "BRAMR4C1");
        assert_eq!(name(SiteKind::Neutral, 5, 5), "GLOBALR6C6");
        assert_eq!(name(SiteKind::Global, 5, 5), "GLOBALR6C6");
    }

    #[test]
    fn names_are_pure() {
        let site = Site {
            kind: SiteKind::Bram,
            coord: LocalCoord { x: 2, y: 9 },
        };
        assert_eq!(site.name(), site.name());
    }

    #[test]
    fn kind_indices() {
        assert_eq!(SiteKind::LENGTH, 16);
        assert_eq!(SiteKind::from_usize(0), SiteKind::Neutral);
        assert_eq!(SiteKind::from_usize(1), SiteKind::Clb);
        assert_eq!(SiteKind::from_usize(14), SiteKind::Bram);
        assert_eq!(SiteKind::from_usize(15), SiteKind::Global);
    }
}
