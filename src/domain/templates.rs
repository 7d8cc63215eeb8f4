//! Built-in section templates with default line items.

use super::entities::{EquipmentItem, HourlyItem, MaterialItem, MaterialUnit, Section};

/// A named starting point for a new section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionTemplate {
    MainlinePaving,
    ParkingLot,
    Driveway,
    Patching,
    Milling,
    Overlay,
}

impl SectionTemplate {
    pub const ALL: [SectionTemplate; 6] = [
        SectionTemplate::MainlinePaving,
        SectionTemplate::ParkingLot,
        SectionTemplate::Driveway,
        SectionTemplate::Patching,
        SectionTemplate::Milling,
        SectionTemplate::Overlay,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::MainlinePaving => "Mainline Paving",
            Self::ParkingLot => "Parking Lot",
            Self::Driveway => "Driveway",
            Self::Patching => "Patching",
            Self::Milling => "Milling",
            Self::Overlay => "Overlay",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim();
        Self::ALL
            .into_iter()
            .find(|template| template.name().eq_ignore_ascii_case(needle))
    }

    /// A fresh section named after the template, pre-filled with its items.
    pub fn build(&self) -> Section {
        let mut section = Section::new(self.name());
        self.fill(&mut section);
        section
    }

    fn fill(&self, section: &mut Section) {
        match self {
            Self::MainlinePaving => {
                section.equipment = vec![
                    EquipmentItem::new("Asphalt Paver", 1.0, 10.0, 285.0).with_operator(true),
                    EquipmentItem::new("Breakdown Roller", 1.0, 10.0, 135.0).with_operator(true),
                    EquipmentItem::new("Finish Roller", 1.0, 10.0, 95.0).with_operator(true),
                    EquipmentItem::new("Skid Steer", 1.0, 10.0, 75.0),
                ];
                section.labor = vec![
                    HourlyItem::new("Foreman", 1.0, 10.0, 55.0),
                    HourlyItem::new("Screed Operator", 2.0, 10.0, 42.0),
                    HourlyItem::new("Raker", 2.0, 10.0, 36.0),
                    HourlyItem::new("Laborer", 2.0, 10.0, 30.0),
                ];
                section.materials = vec![
                    MaterialItem::new("Hot Mix Asphalt", 0.0, MaterialUnit::Tons, 88.0),
                    MaterialItem::new("Tack Coat", 0.0, MaterialUnit::Gallons, 4.25),
                ];
                section.trucking = vec![HourlyItem::new("Tri-Axle Dump", 4.0, 10.0, 115.0)];
            }
            Self::ParkingLot => {
                section.equipment = vec![
                    EquipmentItem::new("Asphalt Paver", 1.0, 8.0, 285.0).with_operator(true),
                    EquipmentItem::new("Tandem Roller", 1.0, 8.0, 110.0).with_operator(true),
                    EquipmentItem::new("Skid Steer", 1.0, 8.0, 75.0),
                ];
                section.labor = vec![
                    HourlyItem::new("Foreman", 1.0, 8.0, 55.0),
                    HourlyItem::new("Raker", 2.0, 8.0, 36.0),
                    HourlyItem::new("Laborer", 2.0, 8.0, 30.0),
                ];
                section.materials = vec![
                    MaterialItem::new("Hot Mix Asphalt", 0.0, MaterialUnit::Tons, 88.0),
                    MaterialItem::new("Tack Coat", 0.0, MaterialUnit::Gallons, 4.25),
                    MaterialItem::new("Stall Striping", 0.0, MaterialUnit::Feet, 0.35),
                ];
                section.trucking = vec![HourlyItem::new("Tri-Axle Dump", 3.0, 8.0, 115.0)];
            }
            Self::Driveway => {
                section.equipment = vec![
                    EquipmentItem::new("Mini Paver", 1.0, 6.0, 165.0).with_operator(true),
                    EquipmentItem::new("Walk-Behind Roller", 1.0, 6.0, 45.0),
                ];
                section.labor = vec![
                    HourlyItem::new("Foreman", 1.0, 6.0, 55.0),
                    HourlyItem::new("Laborer", 2.0, 6.0, 30.0),
                ];
                section.materials = vec![
                    MaterialItem::new("Hot Mix Asphalt", 0.0, MaterialUnit::Tons, 92.0),
                    MaterialItem::new("Crushed Stone Base", 0.0, MaterialUnit::Tons, 28.0),
                ];
                section.trucking = vec![HourlyItem::new("Single-Axle Dump", 1.0, 6.0, 95.0)];
            }
            Self::Patching => {
                section.equipment = vec![
                    EquipmentItem::new("Saw Cutter", 1.0, 8.0, 60.0),
                    EquipmentItem::new("Plate Compactor", 1.0, 8.0, 35.0),
                    EquipmentItem::new("Mini Excavator", 1.0, 8.0, 95.0).with_operator(true),
                ];
                section.labor = vec![
                    HourlyItem::new("Foreman", 1.0, 8.0, 55.0),
                    HourlyItem::new("Laborer", 3.0, 8.0, 30.0),
                ];
                section.materials = vec![
                    MaterialItem::new("Hot Mix Asphalt", 0.0, MaterialUnit::Tons, 95.0),
                    MaterialItem::new("Tack Coat", 0.0, MaterialUnit::Gallons, 4.25),
                ];
                section.trucking = vec![HourlyItem::new("Single-Axle Dump", 1.0, 8.0, 95.0)];
            }
            Self::Milling => {
                section.equipment = vec![
                    EquipmentItem::new("Cold Planer", 1.0, 8.0, 450.0).with_operator(true),
                    EquipmentItem::new("Sweeper", 1.0, 8.0, 85.0).with_operator(true),
                ];
                section.labor = vec![
                    HourlyItem::new("Foreman", 1.0, 8.0, 55.0),
                    HourlyItem::new("Ground Man", 2.0, 8.0, 32.0),
                ];
                section.materials = vec![MaterialItem::new(
                    "Cutting Teeth",
                    0.0,
                    MaterialUnit::Each,
                    6.5,
                )];
                section.trucking = vec![HourlyItem::new("Tri-Axle Dump", 4.0, 8.0, 115.0)];
            }
            Self::Overlay => {
                section.equipment = vec![
                    EquipmentItem::new("Asphalt Paver", 1.0, 10.0, 285.0).with_operator(true),
                    EquipmentItem::new("Tandem Roller", 2.0, 10.0, 110.0).with_operator(true),
                    EquipmentItem::new("Tack Distributor", 1.0, 10.0, 70.0),
                ];
                section.labor = vec![
                    HourlyItem::new("Foreman", 1.0, 10.0, 55.0),
                    HourlyItem::new("Screed Operator", 1.0, 10.0, 42.0),
                    HourlyItem::new("Raker", 2.0, 10.0, 36.0),
                ];
                section.materials = vec![
                    MaterialItem::new("Hot Mix Asphalt", 0.0, MaterialUnit::Tons, 88.0),
                    MaterialItem::new("Tack Coat", 0.0, MaterialUnit::Gallons, 4.25),
                ];
                section.trucking = vec![HourlyItem::new("Tri-Axle Dump", 5.0, 10.0, 115.0)];
            }
        }
    }
}
