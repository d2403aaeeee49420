//! Area-of-interest polygons
//!
//! Polygons are validated once at construction and are read-only afterwards.
//! Rings are stored open: the closing edge from the last vertex back to the
//! first is implicit.

use crate::crs::Crs;
use crate::error::{Error, Result};
use geo_types::{Coord, LineString};

/// A polygon with one outer ring and zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Vec<Coord<f64>>,
    holes: Vec<Vec<Coord<f64>>>,
    crs: Option<Crs>,
}

impl Polygon {
    /// Build a polygon from ring vertices.
    ///
    /// Rings may be given open or closed. Fails with
    /// [`Error::InvalidGeometry`] when a ring has fewer than 3 distinct
    /// vertices or contains a non-finite coordinate.
    pub fn new<C>(exterior: Vec<C>, holes: Vec<Vec<C>>) -> Result<Self>
    where
        C: Into<Coord<f64>>,
    {
        let exterior = normalize_ring(exterior.into_iter().map(Into::into).collect(), "exterior")?;
        let holes = holes
            .into_iter()
            .enumerate()
            .map(|(i, ring)| {
                normalize_ring(ring.into_iter().map(Into::into).collect(), &format!("hole {}", i))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            exterior,
            holes,
            crs: None,
        })
    }

    /// Axis-aligned rectangle, convenient for tests and bounding-box AOIs
    pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        Self::new(
            vec![(min_x, min_y), (max_x, min_y), (max_x, max_y), (min_x, max_y)],
            vec![],
        )
    }

    pub fn with_crs(mut self, crs: Option<Crs>) -> Self {
        self.crs = crs;
        self
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn exterior(&self) -> &[Coord<f64>] {
        &self.exterior
    }

    pub fn holes(&self) -> &[Vec<Coord<f64>>] {
        &self.holes
    }

    /// All rings, exterior first
    pub fn rings(&self) -> impl Iterator<Item = &[Coord<f64>]> {
        std::iter::once(self.exterior.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Every edge of every ring, including each ring's closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Coord<f64>, Coord<f64>)> + '_ {
        self.rings().flat_map(|ring| {
            let n = ring.len();
            (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
        })
    }

    /// Bounding box of the exterior ring (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.exterior.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), c| {
                (min_x.min(c.x), min_y.min(c.y), max_x.max(c.x), max_y.max(c.y))
            },
        )
    }
}

impl TryFrom<&geo_types::Polygon<f64>> for Polygon {
    type Error = Error;

    fn try_from(p: &geo_types::Polygon<f64>) -> Result<Self> {
        Polygon::new(
            ring_coords(p.exterior()),
            p.interiors().iter().map(ring_coords).collect(),
        )
    }
}

fn ring_coords(ls: &LineString<f64>) -> Vec<Coord<f64>> {
    ls.0.clone()
}

/// Drop the closing vertex and consecutive duplicates, then validate.
fn normalize_ring(mut coords: Vec<Coord<f64>>, name: &str) -> Result<Vec<Coord<f64>>> {
    if let Some(c) = coords.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(Error::InvalidGeometry(format!(
            "{} ring has non-finite coordinate ({}, {})",
            name, c.x, c.y
        )));
    }

    coords.dedup();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }

    let distinct = distinct_count(&coords);
    if distinct < 3 {
        return Err(Error::InvalidGeometry(format!(
            "{} ring has {} distinct vertices, need at least 3",
            name, distinct
        )));
    }
    Ok(coords)
}

fn distinct_count(coords: &[Coord<f64>]) -> usize {
    let mut sorted = coords.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();
    sorted.len()
}

/// An area of interest made of one or more polygons.
///
/// Cells inside any part are inside the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    parts: Vec<Polygon>,
}

impl Boundary {
    /// Fails with [`Error::InvalidGeometry`] when `parts` is empty
    pub fn new(parts: Vec<Polygon>) -> Result<Self> {
        if parts.is_empty() {
            return Err(Error::InvalidGeometry("boundary has no polygons".into()));
        }
        Ok(Self { parts })
    }

    /// Assign one CRS to every part
    pub fn with_crs(self, crs: Option<Crs>) -> Self {
        Self {
            parts: self
                .parts
                .into_iter()
                .map(|p| p.with_crs(crs.clone()))
                .collect(),
        }
    }

    pub fn parts(&self) -> &[Polygon] {
        &self.parts
    }
}

impl From<Polygon> for Boundary {
    fn from(polygon: Polygon) -> Self {
        Self {
            parts: vec![polygon],
        }
    }
}

impl TryFrom<&geo_types::MultiPolygon<f64>> for Boundary {
    type Error = Error;

    fn try_from(mp: &geo_types::MultiPolygon<f64>) -> Result<Self> {
        let parts = mp.0.iter().map(Polygon::try_from).collect::<Result<Vec<_>>>()?;
        Boundary::new(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_ring_is_opened() {
        let p = Polygon::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)], vec![]).unwrap();
        assert_eq!(p.exterior().len(), 3);
        assert_eq!(p.edges().count(), 3);
    }

    #[test]
    fn test_degenerate_ring() {
        let err = Polygon::new(vec![(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));

        let err = Polygon::new(vec![(0.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0)], vec![])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));

        // Four stored vertices but only two distinct points
        let err = Polygon::new(vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (1.0, 0.0)], vec![])
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidGeometry("exterior ring has 2 distinct vertices, need at least 3".into())
        );

        // Self-intersecting rings are accepted; only distinct points count
        let bowtie = Polygon::new(
            vec![(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)],
            vec![],
        );
        assert!(bowtie.is_ok());
    }

    #[test]
    fn test_degenerate_hole() {
        let err = Polygon::new(
            vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)],
            vec![vec![(1.0, 1.0), (2.0, 2.0)]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("hole 0"));
    }

    #[test]
    fn test_non_finite() {
        let err = Polygon::new(vec![(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_from_geo_types() {
        let gp = geo_types::Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
            vec![LineString::from(vec![(2.0, 2.0), (4.0, 2.0), (4.0, 4.0)])],
        );
        let p = Polygon::try_from(&gp).unwrap();
        assert_eq!(p.exterior().len(), 4);
        assert_eq!(p.holes().len(), 1);
        assert_eq!(p.rings().count(), 2);
        assert_eq!(p.bounds(), (0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_boundary() {
        assert!(Boundary::new(vec![]).is_err());

        let b = Boundary::from(Polygon::rect(0.0, 0.0, 1.0, 1.0).unwrap())
            .with_crs(Some(Crs::from_epsg(4326)));
        assert_eq!(b.parts()[0].crs(), Some(&Crs::wgs84()));

        let mp = geo_types::MultiPolygon(vec![
            geo_types::Polygon::new(
                LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
                vec![],
            ),
            geo_types::Polygon::new(
                LineString::from(vec![(5.0, 5.0), (6.0, 5.0), (6.0, 6.0)]),
                vec![],
            ),
        ]);
        assert_eq!(Boundary::try_from(&mp).unwrap().parts().len(), 2);
    }
}
