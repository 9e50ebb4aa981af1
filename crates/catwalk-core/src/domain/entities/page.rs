//! Page layout tree: Page → Region → Cell → TasticInstance.
//!
//! Pages are built fresh for every render request and handed to the core
//! read-only. The only mutation the core performs is replacing a tastic's
//! `configuration` object during data completion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::value_objects::Breakpoint;

/// Free-form configuration object of a tastic instance or node.
pub type Configuration = serde_json::Map<String, Value>;

/// A page composed of regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_id: String,
    #[serde(default)]
    pub regions: Vec<Region>,
}

/// A layout region holding an ordered list of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub region_id: String,
    #[serde(default)]
    pub elements: Vec<Cell>,
}

/// A cell holding an ordered list of tastic instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub cell_id: String,
    #[serde(default)]
    pub tastics: Vec<TasticInstance>,
}

/// One placement of a tastic on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasticInstance {
    pub tastic_id: String,
    pub tastic_type: String,
    #[serde(default)]
    pub configuration: Configuration,
}

impl Page {
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            regions: Vec::new(),
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    /// Iterate over every tastic instance in layout order.
    pub fn tastics(&self) -> impl Iterator<Item = &TasticInstance> {
        self.regions
            .iter()
            .flat_map(|region| region.elements.iter())
            .flat_map(|cell| cell.tastics.iter())
    }

    /// Mutable variant of [`Page::tastics`].
    pub fn tastics_mut(&mut self) -> impl Iterator<Item = &mut TasticInstance> {
        self.regions
            .iter_mut()
            .flat_map(|region| region.elements.iter_mut())
            .flat_map(|cell| cell.tastics.iter_mut())
    }

    pub fn tastic_count(&self) -> usize {
        self.tastics().count()
    }
}

impl Region {
    pub fn new(region_id: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            elements: Vec::new(),
        }
    }

    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.elements.push(cell);
        self
    }
}

impl Cell {
    pub fn new(cell_id: impl Into<String>) -> Self {
        Self {
            cell_id: cell_id.into(),
            tastics: Vec::new(),
        }
    }

    pub fn with_tastic(mut self, tastic: TasticInstance) -> Self {
        self.tastics.push(tastic);
        self
    }
}

impl TasticInstance {
    pub fn new(tastic_id: impl Into<String>, tastic_type: impl Into<String>) -> Self {
        Self {
            tastic_id: tastic_id.into(),
            tastic_type: tastic_type.into(),
            configuration: Configuration::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.configuration.insert(key.into(), value);
        self
    }

    /// Copy out the per-breakpoint display configuration.
    ///
    /// Keys that are absent stay absent when restored.
    pub fn breakpoint_backup(&self) -> Vec<(Breakpoint, Value)> {
        Breakpoint::ALL
            .iter()
            .filter_map(|bp| {
                self.configuration
                    .get(bp.as_str())
                    .map(|value| (*bp, value.clone()))
            })
            .collect()
    }

    /// Replace the configuration, re-inserting the given breakpoint values.
    pub fn replace_configuration(
        &mut self,
        mut configuration: Configuration,
        backup: Vec<(Breakpoint, Value)>,
    ) {
        for (breakpoint, value) in backup {
            configuration.insert(breakpoint.as_str().to_string(), value);
        }
        self.configuration = configuration;
    }
}
