//! # Transition Table
//!
//! The single place that knows which status edges are legal and which
//! metadata each edge requires.
//!
//! | From | To | Required metadata |
//! |------|----|-------------------|
//! | `inbound_received` | `sorting` | operator id (always present) |
//! | `sorting` | `sorted` | `sort_bin`, `route_code` |
//! | `sorted` | `dispatched` | `manifest_number` |
//! | any non-terminal | `returned` | `reason` |
//! | any non-terminal | `lost` | `reason` |
//!
//! `sorted` is not re-openable back to `sorting`; a mis-binned parcel goes
//! through `returned` and re-registration. Confirmed with operations as a
//! product decision; adding the re-open edge is a one-line change here.

use shared_types::{ParcelStatus, TransitionMetadata};

/// A metadata field an edge may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    SortBin,
    RouteCode,
    ManifestNumber,
    Reason,
}

impl MetadataField {
    pub fn name(self) -> &'static str {
        match self {
            Self::SortBin => "sort_bin",
            Self::RouteCode => "route_code",
            Self::ManifestNumber => "manifest_number",
            Self::Reason => "reason",
        }
    }
}

/// True when `from -> to` is an edge of the transition table.
pub fn transition_allowed(from: ParcelStatus, to: ParcelStatus) -> bool {
    use ParcelStatus::{Dispatched, InboundReceived, Lost, Returned, Sorted, Sorting};
    match (from, to) {
        (InboundReceived, Sorting) => true,
        (Sorting, Sorted) => true,
        (Sorted, Dispatched) => true,
        // Operational exceptions, reachable from any non-terminal status.
        (from, Returned | Lost) => !from.is_terminal(),
        _ => false,
    }
}

/// The metadata fields required when transitioning *into* `to`.
pub fn required_metadata(to: ParcelStatus) -> &'static [MetadataField] {
    use ParcelStatus::{Dispatched, Lost, Returned, Sorted};
    match to {
        Sorted => &[MetadataField::SortBin, MetadataField::RouteCode],
        Dispatched => &[MetadataField::ManifestNumber],
        Returned | Lost => &[MetadataField::Reason],
        _ => &[],
    }
}

/// The first required field absent from `metadata`, if any.
pub fn missing_metadata(to: ParcelStatus, metadata: &TransitionMetadata) -> Option<&'static str> {
    required_metadata(to)
        .iter()
        .find(|field| match field {
            MetadataField::SortBin => metadata.sort_bin.is_none(),
            MetadataField::RouteCode => metadata.route_code.is_none(),
            MetadataField::ManifestNumber => metadata.manifest_number.is_none(),
            MetadataField::Reason => metadata.reason.is_none(),
        })
        .map(|field| field.name())
}
