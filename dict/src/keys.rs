//! Static tag tables fixed at design time.
//!
//! These tables map the known field names of the input document to the tag
//! bytes used in the primary stream, and name the typed record kinds of the
//! auxiliary stream. They are written into the sidecar verbatim so a
//! decoder can resolve tags back to names.

/// Tag for a top-level item field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ItemKey {
    Pk3 = 1,
    Shasum = 2,
    Filesize = 3,
    Date = 4,
    Bsp = 5,
}

impl ItemKey {
    /// Every item key, in tag order.
    pub const ALL: [Self; 5] = [Self::Pk3, Self::Shasum, Self::Filesize, Self::Date, Self::Bsp];

    /// Looks up a field name. Unknown names are simply absent, which the
    /// encoder treats as "skip this field".
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pk3" => Some(Self::Pk3),
            "shasum" => Some(Self::Shasum),
            "filesize" => Some(Self::Filesize),
            "date" => Some(Self::Date),
            "bsp" => Some(Self::Bsp),
            _ => None,
        }
    }

    /// The tag byte written to the primary stream.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// The field name as it appears in the input document and the sidecar.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pk3 => "pk3",
            Self::Shasum => "shasum",
            Self::Filesize => "filesize",
            Self::Date => "date",
            Self::Bsp => "bsp",
        }
    }
}

/// Tag for a field inside one bsp entry (map variant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BspKey {
    Name = 1,
    Mapshot = 2,
    Mapinfo = 3,
    Waypoints = 4,
    Map = 5,
    Radar = 6,
    Title = 7,
    Description = 8,
    Author = 9,
    License = 10,
    Gametypes = 11,
    Entities = 12,
}

impl BspKey {
    /// Every bsp key, in tag order.
    pub const ALL: [Self; 12] = [
        Self::Name,
        Self::Mapshot,
        Self::Mapinfo,
        Self::Waypoints,
        Self::Map,
        Self::Radar,
        Self::Title,
        Self::Description,
        Self::Author,
        Self::License,
        Self::Gametypes,
        Self::Entities,
    ];

    /// Looks up a field name. Unknown names inside a variant are diagnosed
    /// by the encoder before being skipped.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "mapshot" => Some(Self::Mapshot),
            "mapinfo" => Some(Self::Mapinfo),
            "waypoints" => Some(Self::Waypoints),
            "map" => Some(Self::Map),
            "radar" => Some(Self::Radar),
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "author" => Some(Self::Author),
            "license" => Some(Self::License),
            "gametypes" => Some(Self::Gametypes),
            "entities" => Some(Self::Entities),
            _ => None,
        }
    }

    /// The tag byte written to the primary stream.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// The field name as it appears in the input document and the sidecar.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Mapshot => "mapshot",
            Self::Mapinfo => "mapinfo",
            Self::Waypoints => "waypoints",
            Self::Map => "map",
            Self::Radar => "radar",
            Self::Title => "title",
            Self::Description => "description",
            Self::Author => "author",
            Self::License => "license",
            Self::Gametypes => "gametypes",
            Self::Entities => "entities",
        }
    }
}

/// Type tag of an auxiliary stream record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PayloadKind {
    /// 2-byte length + raw string bytes.
    String = 1,
    /// 2-byte length fixed to 20 + 20 raw checksum bytes.
    Shasum = 2,
    /// 2-byte byte-length + (1-byte class id, 2-byte count) entries.
    Entities = 3,
}

impl PayloadKind {
    /// Every payload kind, in tag order.
    pub const ALL: [Self; 3] = [Self::String, Self::Shasum, Self::Entities];

    /// The type tag byte written to the auxiliary stream.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// The record kind name as it appears in the sidecar.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Shasum => "shasum",
            Self::Entities => "entities",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_key_tags_are_stable() {
        assert_eq!(ItemKey::Pk3.tag(), 1);
        assert_eq!(ItemKey::Shasum.tag(), 2);
        assert_eq!(ItemKey::Filesize.tag(), 3);
        assert_eq!(ItemKey::Date.tag(), 4);
        assert_eq!(ItemKey::Bsp.tag(), 5);
    }

    #[test]
    fn item_key_name_roundtrip() {
        for key in ItemKey::ALL {
            assert_eq!(ItemKey::from_name(key.name()), Some(key));
        }
    }

    #[test]
    fn item_key_unknown_name() {
        assert_eq!(ItemKey::from_name("screenshot"), None);
        assert_eq!(ItemKey::from_name(""), None);
    }

    #[test]
    fn bsp_key_tags_are_stable() {
        assert_eq!(BspKey::Name.tag(), 1);
        assert_eq!(BspKey::Radar.tag(), 6);
        assert_eq!(BspKey::Gametypes.tag(), 11);
        assert_eq!(BspKey::Entities.tag(), 12);
    }

    #[test]
    fn bsp_key_name_roundtrip() {
        for key in BspKey::ALL {
            assert_eq!(BspKey::from_name(key.name()), Some(key));
        }
    }

    #[test]
    fn bsp_key_unknown_name() {
        assert_eq!(BspKey::from_name("minimap"), None);
    }

    #[test]
    fn payload_kind_tags_are_stable() {
        assert_eq!(PayloadKind::String.tag(), 1);
        assert_eq!(PayloadKind::Shasum.tag(), 2);
        assert_eq!(PayloadKind::Entities.tag(), 3);
    }

    #[test]
    fn all_tables_have_distinct_tags() {
        let mut item_tags: Vec<u8> = ItemKey::ALL.iter().map(|k| k.tag()).collect();
        item_tags.dedup();
        assert_eq!(item_tags.len(), ItemKey::ALL.len());

        let mut bsp_tags: Vec<u8> = BspKey::ALL.iter().map(|k| k.tag()).collect();
        bsp_tags.dedup();
        assert_eq!(bsp_tags.len(), BspKey::ALL.len());
    }

    #[test]
    fn tag_zero_is_reserved_for_terminators() {
        assert!(ItemKey::ALL.iter().all(|k| k.tag() != 0));
        assert!(BspKey::ALL.iter().all(|k| k.tag() != 0));
        assert!(PayloadKind::ALL.iter().all(|k| k.tag() != 0));
    }
}
