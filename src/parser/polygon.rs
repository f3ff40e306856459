//! Polygon ring extraction

use super::tags;
use crate::document::TreeNode;
use crate::error::{Error, Result};
use crate::model::Vertex;
use crate::transform::CoordinateTransform;

/// Path from a `gml:Polygon` to its exterior linear ring
const EXTERIOR_RING_PATH: [&str; 2] = [tags::EXTERIOR, tags::LINEAR_RING];

/// Read the exterior ring of a `gml:Polygon` as render-space vertices
///
/// The last coordinate triple repeats the first to close the ring and is
/// dropped, so a ring declaring `N` points yields `N - 1` vertices.
///
/// A missing exterior ring or coordinate list, or an unreadable coordinate
/// list, yields an empty ring; the caller decides how to treat it.
pub fn parse_polygon<N: TreeNode>(polygon: &N, transform: &CoordinateTransform) -> Vec<Vertex> {
    let ring = match polygon.find_path(&EXTERIOR_RING_PATH) {
        Ok(ring) => ring,
        Err(missing) => {
            tracing::debug!(%missing, "polygon skipped");
            return Vec::new();
        }
    };

    let coordinates = match ring.child(tags::POS_LIST) {
        Some(pos_list) => read_pos_list(pos_list),
        None => {
            let positions: Vec<&N> = ring.children_named(tags::POS).collect();
            if positions.is_empty() {
                tracing::debug!("linear ring has neither gml:posList nor gml:pos");
                return Vec::new();
            }
            read_positions(&positions)
        }
    };

    let coordinates = match coordinates {
        Ok(coordinates) => coordinates,
        Err(error) => {
            tracing::warn!(%error, "unreadable ring coordinates, polygon skipped");
            return Vec::new();
        }
    };

    let retained = coordinates.len().saturating_sub(1);
    coordinates[..retained]
        .iter()
        .map(|&[easting, northing, elevation]| transform.apply(easting, northing, elevation))
        .collect()
}

/// Parse a whitespace-separated list of numbers into (x, y, z) triples
///
/// # Errors
///
/// Returns [`Error::ParseError`] if a token is not a finite number or the
/// number of values is not a multiple of three.
pub fn parse_pos_list(text: &str) -> Result<Vec<[f64; 3]>> {
    let values = text
        .split_whitespace()
        .map(|token| {
            let value: f64 = token.parse().map_err(|_| {
                Error::parse_error_with_context("posList value", token, "floating-point number")
            })?;
            if !value.is_finite() {
                return Err(Error::parse_error_with_context(
                    "posList value",
                    token,
                    "finite number",
                ));
            }
            Ok(value)
        })
        .collect::<Result<Vec<f64>>>()?;

    if values.len() % 3 != 0 {
        return Err(Error::ParseError(format!(
            "posList holds {} values, which is not a multiple of 3",
            values.len()
        )));
    }

    Ok(values
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect())
}

fn read_pos_list<N: TreeNode>(pos_list: &N) -> Result<Vec<[f64; 3]>> {
    if let Some(dimension) = pos_list.attribute(tags::SRS_DIMENSION) {
        if dimension.trim() != "3" {
            return Err(Error::ParseError(format!(
                "posList srsDimension {} is not supported, only 3D coordinates are",
                dimension
            )));
        }
    }
    parse_pos_list(pos_list.text())
}

fn read_positions<N: TreeNode>(positions: &[&N]) -> Result<Vec<[f64; 3]>> {
    positions
        .iter()
        .map(|pos| match parse_pos_list(pos.text())?.as_slice() {
            [triple] => Ok(*triple),
            other => Err(Error::ParseError(format!(
                "gml:pos must hold exactly one coordinate triple, found {}",
                other.len()
            ))),
        })
        .collect()
}
