//! The proof verification checklist and the terms shown alongside it.
//!
//! The checklist is a fixed set of boolean verification points. It
//! serializes as a JSON object keyed by [`ChecklistKey::as_str`]; keys that
//! are absent on input read as unchecked.

use serde::{Deserialize, Serialize};

/* --------------------------------------------------------------------------
Proof terms
-------------------------------------------------------------------------- */

/// Notice the customer must read before approving any artwork.
pub const PROOF_NOTICE: &[&str] = &[
    "This proof is an exact duplicate of the original production artwork that will be used to print your product.",
    "All copy, punctuation and spelling has been proof read by the account executive.",
    "We will not be responsible for any discrepancies that are approved by the customer.",
    "Color Management will be controlled by other document.",
];

/// Production tolerances the approval is subject to.
pub const PROOF_TOLERANCES: &[&str] = &["Bag Making Tolerance +/-2mm", "Color Tolerance +/-10%"];

/* --------------------------------------------------------------------------
Keys
-------------------------------------------------------------------------- */

/// One verification point on the checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistKey {
    Size,
    CorrectColours,
    EyespotSizeLocation,
    WeightDescription,
    CorrectUpcBarcode,
    RollDirection,
    AddOns,
    FinLapSeal,
}

impl ChecklistKey {
    /// Every key, in display order.
    pub const ALL: [ChecklistKey; 8] = [
        ChecklistKey::Size,
        ChecklistKey::CorrectColours,
        ChecklistKey::EyespotSizeLocation,
        ChecklistKey::WeightDescription,
        ChecklistKey::CorrectUpcBarcode,
        ChecklistKey::RollDirection,
        ChecklistKey::AddOns,
        ChecklistKey::FinLapSeal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChecklistKey::Size => "size",
            ChecklistKey::CorrectColours => "correct_colours",
            ChecklistKey::EyespotSizeLocation => "eyespot_size_location",
            ChecklistKey::WeightDescription => "weight_description",
            ChecklistKey::CorrectUpcBarcode => "correct_upc_barcode",
            ChecklistKey::RollDirection => "roll_direction",
            ChecklistKey::AddOns => "add_ons",
            ChecklistKey::FinLapSeal => "fin_lap_seal",
        }
    }

    /// Human-readable label for the review form.
    pub fn label(self) -> &'static str {
        match self {
            ChecklistKey::Size => "Size",
            ChecklistKey::CorrectColours => "Correct Colours",
            ChecklistKey::EyespotSizeLocation => "Eyespot Size and Location",
            ChecklistKey::WeightDescription => "Weight Description",
            ChecklistKey::CorrectUpcBarcode => "Correct UPC/Bar Code",
            ChecklistKey::RollDirection => "Roll Direction",
            ChecklistKey::AddOns => "Add Ons (e.g. zipper, tear notch, etc)",
            ChecklistKey::FinLapSeal => "Fin/Lap Seal",
        }
    }
}

/* --------------------------------------------------------------------------
Checklist
-------------------------------------------------------------------------- */

/// The customer's verification state for one artwork item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checklist {
    pub size: bool,
    pub correct_colours: bool,
    pub eyespot_size_location: bool,
    pub weight_description: bool,
    pub correct_upc_barcode: bool,
    pub roll_direction: bool,
    pub add_ons: bool,
    pub fin_lap_seal: bool,
}

impl Checklist {
    /// A checklist with every point confirmed.
    pub fn all_checked() -> Self {
        let mut checklist = Self::default();
        for key in ChecklistKey::ALL {
            checklist.set(key, true);
        }
        checklist
    }

    pub fn get(&self, key: ChecklistKey) -> bool {
        match key {
            ChecklistKey::Size => self.size,
            ChecklistKey::CorrectColours => self.correct_colours,
            ChecklistKey::EyespotSizeLocation => self.eyespot_size_location,
            ChecklistKey::WeightDescription => self.weight_description,
            ChecklistKey::CorrectUpcBarcode => self.correct_upc_barcode,
            ChecklistKey::RollDirection => self.roll_direction,
            ChecklistKey::AddOns => self.add_ons,
            ChecklistKey::FinLapSeal => self.fin_lap_seal,
        }
    }

    pub fn set(&mut self, key: ChecklistKey, checked: bool) {
        let slot = match key {
            ChecklistKey::Size => &mut self.size,
            ChecklistKey::CorrectColours => &mut self.correct_colours,
            ChecklistKey::EyespotSizeLocation => &mut self.eyespot_size_location,
            ChecklistKey::WeightDescription => &mut self.weight_description,
            ChecklistKey::CorrectUpcBarcode => &mut self.correct_upc_barcode,
            ChecklistKey::RollDirection => &mut self.roll_direction,
            ChecklistKey::AddOns => &mut self.add_ons,
            ChecklistKey::FinLapSeal => &mut self.fin_lap_seal,
        };
        *slot = checked;
    }

    /// Keys that are not yet confirmed, in display order.
    pub fn missing(&self) -> Vec<ChecklistKey> {
        ChecklistKey::ALL
            .into_iter()
            .filter(|key| !self.get(*key))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        ChecklistKey::ALL.into_iter().all(|key| self.get(key))
    }
}

/// A checklist point as presented to the review form.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItemInfo {
    pub key: ChecklistKey,
    pub label: &'static str,
}

/// Static proof terms returned with every batch the customer loads.
#[derive(Debug, Clone, Serialize)]
pub struct ProofTerms {
    pub notice: &'static [&'static str],
    pub tolerances: &'static [&'static str],
    pub checklist: Vec<ChecklistItemInfo>,
}

impl ProofTerms {
    pub fn current() -> Self {
        Self {
            notice: PROOF_NOTICE,
            tolerances: PROOF_TOLERANCES,
            checklist: ChecklistKey::ALL
                .into_iter()
                .map(|key| ChecklistItemInfo {
                    key,
                    label: key.label(),
                })
                .collect(),
        }
    }
}
