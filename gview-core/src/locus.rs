//! Locus string parsing and name resolution for jump requests.
//!
//! Accepted forms: `chr1:1000-2000`, `chr1:1500` (single position), and a
//! bare chromosome name. Coordinates are 0-based half-open and may contain
//! thousands separators. Anything else is handed to the application's
//! `LocusResolver` (gene symbols, rsIDs).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{LayoutError, LayoutResult};
use crate::types::{Bp, ChromSizes, Locus};

static LOCUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<chrom>[A-Za-z0-9_.]+):(?P<start>[0-9,]+)(?:-(?P<stop>[0-9,]+))?$")
        .expect("locus regex is valid")
});

/// Application-supplied lookup from a gene symbol or rsID to coordinates.
pub trait LocusResolver {
    fn resolve(&self, name: &str) -> Option<Locus>;
}

fn parse_number(s: &str) -> LayoutResult<Bp> {
    s.replace(',', "")
        .parse::<Bp>()
        .map_err(|_| LayoutError::invalid_coordinate(format!("bad coordinate '{s}'")))
}

/// Parse a `chrom:start-stop` style string without validating the
/// chromosome against a genome build.
pub fn parse_locus(input: &str) -> LayoutResult<Locus> {
    let caps = LOCUS_RE
        .captures(input.trim())
        .ok_or_else(|| LayoutError::invalid_coordinate(format!("unparseable locus '{input}'")))?;
    let chrom = caps["chrom"].to_string();
    let start = parse_number(&caps["start"])?;
    let stop = match caps.name("stop") {
        Some(m) => parse_number(m.as_str())?,
        None => start + 1,
    };
    if start >= stop {
        return Err(LayoutError::invalid_coordinate(format!(
            "locus '{input}' has stop <= start"
        )));
    }
    Ok(Locus { chrom, start, stop })
}

/// Resolve a jump target to a validated locus: coordinate string first,
/// then bare chromosome, then the resolver.
pub fn resolve_target(
    target: &str,
    sizes: &ChromSizes,
    resolver: Option<&dyn LocusResolver>,
) -> LayoutResult<Locus> {
    let target = target.trim();
    if target.is_empty() {
        return Err(LayoutError::invalid_coordinate("empty jump target"));
    }

    if LOCUS_RE.is_match(target) {
        let locus = parse_locus(target)?;
        return validate_locus(locus, sizes);
    }

    if sizes.contains(target) {
        let len = sizes.len_of(target)?;
        return Ok(Locus::new(target, 0, len));
    }

    if let Some(locus) = resolver.and_then(|r| r.resolve(target)) {
        log::debug!("jump target '{}' resolved to {}", target, locus);
        return validate_locus(locus, sizes);
    }

    Err(LayoutError::invalid_coordinate(format!(
        "cannot resolve jump target '{target}'"
    )))
}

fn validate_locus(locus: Locus, sizes: &ChromSizes) -> LayoutResult<Locus> {
    let len = sizes.len_of(&locus.chrom)?;
    if locus.start < 0 || locus.start >= len {
        return Err(LayoutError::invalid_coordinate(format!(
            "{} is outside {} (length {})",
            locus, locus.chrom, len
        )));
    }
    // A stop past the chromosome end is tolerated and trimmed.
    let stop = locus.stop.min(len);
    Ok(Locus { stop, ..locus })
}
