//! Builds a [`Chip`] from its two description sources.
//!
//! The dimension source has a single `DIMENSIONS` group with `WIDTH` and
//! `HEIGHT` keys.  The site-data source has one group per region set, with
//! `x` and `y` keys listing `[lo, hi)` bound pairs and a `type` key indexing
//! [`SiteKind`]; every site in the cartesian product of the two interval
//! unions gets that kind.  Any group present is a paint instruction; the
//! group name itself carries no meaning.

use std::error::Error;
use std::path::Path;

use enum_map::{Enum, EnumMap};
use simple_error::bail;
use sitegrid_keyfile::KeyFile;
use unnamed_entity::EntityId;

use crate::chip::{Chip, ColId, LocalCoord, RowId, SiteKind};

/// Values covered by a flattened list of `[lo, hi)` bound pairs, in input
/// order.  A trailing unpaired bound never reaches the iterator; callers
/// that consider it an error must check the length themselves.
fn interval_values(bounds: &[i32]) -> impl Iterator<Item = i32> {
    bounds.chunks_exact(2).flat_map(|pair| pair[0]..pair[1])
}

struct LocalCounter {
    x: i32,
    y: i32,
    y_global: i32,
}

impl Default for LocalCounter {
    fn default() -> Self {
        LocalCounter {
            x: -1,
            y: -1,
            y_global: -1,
        }
    }
}

struct Builder {
    chip: Chip,
}

impl Builder {
    fn paint_group(&mut self, data: &KeyFile, group: &str) -> Result<(), Box<dyn Error>> {
        let xs = data.get_int_list(group, "x")?;
        let ys = data.get_int_list(group, "y")?;
        let kind = data.get_int(group, "type")?;
        if xs.len() % 2 != 0 {
            bail!("group {group}: key x: odd interval bound count {n}", n = xs.len());
        }
        if ys.len() % 2 != 0 {
            bail!("group {group}: key y: odd interval bound count {n}", n = ys.len());
        }
        assert!(
            (0..SiteKind::LENGTH as i32).contains(&kind),
            "group {group}: site kind index {kind} out of range"
        );
        self.paint_region(SiteKind::from_usize(kind as usize), &xs, &ys);
        Ok(())
    }

    fn paint_region(&mut self, kind: SiteKind, xs: &[i32], ys: &[i32]) {
        for y in interval_values(ys) {
            for x in interval_values(xs) {
                let site = self
                    .chip
                    .site_mut(ColId::from_idx(x as usize), RowId::from_idx(y as usize));
                assert_eq!(
                    site.kind,
                    SiteKind::Neutral,
                    "site ({x},{y}) already painted"
                );
                site.kind = kind;
            }
        }
    }

    /// One row-major sweep assigning every site its kind-local coordinate.
    /// A kind starts a new local row whenever it shows up in a global row it
    /// has not been seen in yet; the comparison is against the global row
    /// number, not a per-kind occurrence count.
    fn fill_coords(&mut self) {
        let mut counters: EnumMap<SiteKind, LocalCounter> = EnumMap::default();
        for row in self.chip.rows() {
            for col in self.chip.cols() {
                let site = self.chip.site_mut(col, row);
                let count = &mut counters[site.kind];
                if count.y_global < row.to_idx() as i32 {
                    count.y += 1;
                    count.x = 0;
                    count.y_global = row.to_idx() as i32;
                } else {
                    count.x += 1;
                }
                site.coord = LocalCoord {
                    x: count.x as u32,
                    y: count.y as u32,
                };
            }
        }
    }
}

fn build(control: &KeyFile, data: &KeyFile) -> Result<Chip, Box<dyn Error>> {
    let width = control.get_int("DIMENSIONS", "WIDTH")?;
    let height = control.get_int("DIMENSIONS", "HEIGHT")?;
    if width <= 0 || height <= 0 {
        bail!("group DIMENSIONS: bad grid size {width}x{height}");
    }
    let mut builder = Builder {
        chip: Chip::new(width as usize, height as usize),
    };
    for group in data.groups() {
        builder.paint_group(data, group)?;
    }
    builder.fill_coords();
    Ok(builder.chip)
}

fn load_keyfile(path: &Path) -> Result<KeyFile, Box<dyn Error>> {
    match KeyFile::from_file(path) {
        Ok(kf) => Ok(kf),
        Err(e) => bail!("{path}: {e}", path = path.display()),
    }
}

fn try_build_chip(control: &Path, data: &Path) -> Result<Chip, Box<dyn Error>> {
    let control = load_keyfile(control)?;
    let data = load_keyfile(data)?;
    build(&control, &data)
}

/// Builds the chip described by the given dimension and site-data sources.
///
/// Unreadable or malformed input aborts the build: a warning naming the
/// offending file, group or key is printed and `None` is returned.
/// Double-painted sites and out-of-range kind indices are defects in the
/// description, not input errors, and panic instead.
pub fn build_chip(control: impl AsRef<Path>, data: impl AsRef<Path>) -> Option<Chip> {
    match try_build_chip(control.as_ref(), data.as_ref()) {
        Ok(chip) => Some(chip),
        Err(e) => {
            eprintln!("WARNING: cannot build chip: {e}");
            None
        }
    }
}

/// [`build_chip`] on the `chip_control` and `chip_data` files of a per-chip
/// directory.
pub fn build_chip_from_dir(dir: impl AsRef<Path>) -> Option<Chip> {
    let dir = dir.as_ref();
    build_chip(dir.join("chip_control"), dir.join("chip_data"))
}
