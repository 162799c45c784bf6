//! Human-readable views of decoded frames.
//!
//! [`Breakdown`] rows are produced per layer by the decoders; the helpers here
//! assemble them into whole-frame text, one-line summaries and JSON records.

use std::fmt::Write as _;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::pdu::{Header, HeaderKey, PduChain, PduView};
use crate::protocols::HeaderDecoder;

/// One rendered field of a layer, possibly with nested sub-fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Header view the row was rendered from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Header>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Breakdown>,
}

impl Breakdown {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
            span: None,
            children: Vec::new(),
        }
    }

    /// Row for a header of `pdu`: its name, rendered value and span.
    pub fn field<D: HeaderDecoder + ?Sized>(decoder: &D, key: HeaderKey, pdu: &PduView<'_>) -> Self {
        Self {
            span: pdu.span(key),
            ..Self::new(decoder.header_name(key), decoder.render(key, pdu))
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_span(mut self, span: Header) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_children(mut self, children: Vec<Breakdown>) -> Self {
        self.children = children;
        self
    }

    fn write_lines(&self, out: &mut String, depth: usize) {
        let indent = "    ".repeat(depth);
        let _ = write!(out, "{indent}{}: {}", self.name, self.value);
        if let Some(description) = &self.description {
            let _ = write!(out, " ({description})");
        }
        out.push('\n');
        for child in &self.children {
            child.write_lines(out, depth + 1);
        }
    }
}

/// One-line description of a layer built from its significant headers.
///
/// ```text
/// Internet Protocol version 4, Source: 10.0.0.1, Destination: 10.0.0.2, Protocol: ICMP
/// ```
pub fn layer_title(pdu: &PduView<'_>) -> String {
    let mut title = pdu.protocol().full_name().to_string();
    let Some(decoder) = pdu.decoder() else {
        return title;
    };
    for key in decoder.significant_headers(pdu) {
        let _ = write!(title, ", {}: {}", decoder.header_name(key), decoder.render(key, pdu));
    }
    title
}

/// Multi-line rendering of every layer: its title, then its breakdown rows.
pub fn format_chain<B: AsRef<[u8]>>(chain: &PduChain<B>) -> String {
    let mut out = String::new();
    for pdu in chain.iter() {
        out.push_str(&layer_title(&pdu));
        out.push('\n');
        for row in pdu.breakdown() {
            row.write_lines(&mut out, 1);
        }
    }
    if let Some(last) = chain.last() {
        let payload = last.payload();
        if !payload.is_empty() {
            let _ = writeln!(out, "Payload: {} bytes", payload.len());
        }
    }
    out
}

/// Condensed view of a frame, as shown in a capture table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameSummary {
    pub source: String,
    pub destination: String,
    /// Short name of the innermost decoded layer.
    pub protocol: String,
    pub size: usize,
    pub layers: Vec<String>,
}

impl FrameSummary {
    /// Endpoints come from the innermost layer whose addresses render.
    pub fn from_chain<B: AsRef<[u8]>>(chain: &PduChain<B>) -> Self {
        let endpoints = chain.iter().rev().find_map(|pdu| {
            let decoder = pdu.decoder()?;
            let (source, destination) = decoder.endpoints()?;
            let source = decoder.try_render(source, &pdu).ok()?;
            let destination = decoder.try_render(destination, &pdu).ok()?;
            Some((source, destination))
        });
        let (source, destination) = endpoints.unwrap_or_default();
        Self {
            source,
            destination,
            protocol: chain
                .last()
                .map(|pdu| pdu.protocol().short_name().to_string())
                .unwrap_or_default(),
            size: chain.frame().len(),
            layers: chain
                .protocols()
                .into_iter()
                .map(|protocol| protocol.short_name().to_string())
                .collect(),
        }
    }
}

/// Breakdown of one layer inside a [`FrameRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerRecord {
    pub protocol: String,
    pub title: String,
    pub fields: Vec<Breakdown>,
}

/// Serializable form of a decoded frame, one per JSON line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub summary: FrameSummary,
    pub layers: Vec<LayerRecord>,
}

impl FrameRecord {
    pub fn new<B: AsRef<[u8]>>(index: u64, ts: Option<f64>, chain: &PduChain<B>) -> Self {
        Self {
            index,
            timestamp: ts_to_rfc3339(ts),
            summary: FrameSummary::from_chain(chain),
            layers: chain
                .iter()
                .map(|pdu| LayerRecord {
                    protocol: pdu.protocol().short_name().to_string(),
                    title: layer_title(&pdu),
                    fields: pdu.breakdown(),
                })
                .collect(),
        }
    }
}

/// Format capture seconds since the epoch as RFC 3339.
pub fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
