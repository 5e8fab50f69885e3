//! Traffic object classes and the allowed-class set

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Object classes counted as traffic, with their COCO class ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectClass {
    Person,
    Car,
    Motorbike,
    Bus,
    Truck,
}

impl ObjectClass {
    /// COCO class id as emitted by YOLO-family detectors
    pub fn class_id(&self) -> u32 {
        match self {
            ObjectClass::Person => 0,
            ObjectClass::Car => 2,
            ObjectClass::Motorbike => 3,
            ObjectClass::Bus => 5,
            ObjectClass::Truck => 7,
        }
    }

    /// Map a class id back to a traffic class
    pub fn from_class_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(ObjectClass::Person),
            2 => Some(ObjectClass::Car),
            3 => Some(ObjectClass::Motorbike),
            5 => Some(ObjectClass::Bus),
            7 => Some(ObjectClass::Truck),
            _ => None,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectClass::Person => "person",
            ObjectClass::Car => "car",
            ObjectClass::Motorbike => "motorbike",
            ObjectClass::Bus => "bus",
            ObjectClass::Truck => "truck",
        }
    }
}

/// The class ids whose detections count toward density
///
/// Fixed at startup, immutable afterwards. Configured as a plain id set so a
/// detector with a custom class table can still be filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedClasses(BTreeSet<u32>);

impl Default for AllowedClasses {
    fn default() -> Self {
        Self::from_ids(
            [
                ObjectClass::Person,
                ObjectClass::Car,
                ObjectClass::Motorbike,
                ObjectClass::Bus,
                ObjectClass::Truck,
            ]
            .iter()
            .map(|c| c.class_id()),
        )
    }
}

impl AllowedClasses {
    pub fn from_ids(ids: impl IntoIterator<Item = u32>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn contains(&self, class_id: u32) -> bool {
        self.0.contains(&class_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_id_round_trip() {
        for class in [
            ObjectClass::Person,
            ObjectClass::Car,
            ObjectClass::Motorbike,
            ObjectClass::Bus,
            ObjectClass::Truck,
        ] {
            assert_eq!(ObjectClass::from_class_id(class.class_id()), Some(class));
        }
        // Bicycle is a COCO class but not traffic here
        assert_eq!(ObjectClass::from_class_id(1), None);
    }

    #[test]
    fn test_default_allowed_set() {
        let allowed = AllowedClasses::default();
        assert_eq!(allowed.len(), 5);
        for id in [0, 2, 3, 5, 7] {
            assert!(allowed.contains(id));
        }
        assert!(!allowed.contains(1));
        assert!(!allowed.contains(9));
    }

    #[test]
    fn test_custom_set() {
        let allowed = AllowedClasses::from_ids([2, 7]);
        assert!(allowed.contains(2));
        assert!(!allowed.contains(0));
    }
}
