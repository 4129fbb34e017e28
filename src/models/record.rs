use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field — One named column of the annual dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Year,
    NetRevenues,
    CostOfSales,
    SgAndACosts,
    RdCosts,
    DepreciationAmortization,
    CashFlowOperating,
    CashFlowInvesting,
    CashFlowFinancing,
    WipInventory,
    FinishedGoodsInventory,
    RawMaterialsInventory,
    CarUnitsSold,
}

impl Field {
    /// Every column, in tabular order.
    pub const ALL: [Field; 13] = [
        Field::Year,
        Field::NetRevenues,
        Field::CostOfSales,
        Field::SgAndACosts,
        Field::RdCosts,
        Field::DepreciationAmortization,
        Field::CashFlowOperating,
        Field::CashFlowInvesting,
        Field::CashFlowFinancing,
        Field::WipInventory,
        Field::FinishedGoodsInventory,
        Field::RawMaterialsInventory,
        Field::CarUnitsSold,
    ];

    /// Estimator inputs: everything except the year and the target.
    pub const FEATURES: [Field; 11] = [
        Field::CostOfSales,
        Field::SgAndACosts,
        Field::RdCosts,
        Field::DepreciationAmortization,
        Field::CashFlowOperating,
        Field::CashFlowInvesting,
        Field::CashFlowFinancing,
        Field::WipInventory,
        Field::FinishedGoodsInventory,
        Field::RawMaterialsInventory,
        Field::CarUnitsSold,
    ];

    pub const TARGET: Field = Field::NetRevenues;

    /// Fields scaled by the growth rate on every forecast step.
    pub const GROWING: [Field; 8] = [
        Field::CostOfSales,
        Field::SgAndACosts,
        Field::RdCosts,
        Field::DepreciationAmortization,
        Field::CashFlowOperating,
        Field::CashFlowInvesting,
        Field::CashFlowFinancing,
        Field::CarUnitsSold,
    ];

    /// Column header used in tabular input.
    pub fn column(self) -> &'static str {
        match self {
            Field::Year => "Year",
            Field::NetRevenues => "Net revenues",
            Field::CostOfSales => "Cost of sales",
            Field::SgAndACosts => "Selling general and administrative costs",
            Field::RdCosts => "Research and development costs",
            Field::DepreciationAmortization => "Depreciation and amortization",
            Field::CashFlowOperating => "Cash flow from operating activities",
            Field::CashFlowInvesting => "Cash flow from investing activities",
            Field::CashFlowFinancing => "Cash flow from financing activities",
            Field::WipInventory => "Work-in-progress inventories",
            Field::FinishedGoodsInventory => "Finished goods inventories",
            Field::RawMaterialsInventory => "Raw materials inventories",
            Field::CarUnitsSold => "Car sales (in unit)",
        }
    }

    /// Look up a field by its exact column header.
    pub fn from_column(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.column() == name)
    }
}

// ---------------------------------------------------------------------------
// FinancialRecord — One year of income-statement and cash-flow figures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Net revenues")]
    pub net_revenues: f64,
    #[serde(rename = "Cost of sales")]
    pub cost_of_sales: f64,
    #[serde(rename = "Selling general and administrative costs")]
    pub sg_and_a_costs: f64,
    #[serde(rename = "Research and development costs")]
    pub rd_costs: f64,
    #[serde(rename = "Depreciation and amortization")]
    pub depreciation_amortization: f64,
    #[serde(rename = "Cash flow from operating activities")]
    pub cash_flow_operating: f64,
    #[serde(rename = "Cash flow from investing activities")]
    pub cash_flow_investing: f64,
    #[serde(rename = "Cash flow from financing activities")]
    pub cash_flow_financing: f64,
    #[serde(rename = "Work-in-progress inventories")]
    pub wip_inventory: f64,
    #[serde(rename = "Finished goods inventories")]
    pub finished_goods_inventory: f64,
    #[serde(rename = "Raw materials inventories")]
    pub raw_materials_inventory: f64,
    #[serde(rename = "Car sales (in unit)")]
    pub car_units_sold: f64,
}

impl FinancialRecord {
    /// Read a field as `f64` (the year is widened).
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Year => f64::from(self.year),
            Field::NetRevenues => self.net_revenues,
            Field::CostOfSales => self.cost_of_sales,
            Field::SgAndACosts => self.sg_and_a_costs,
            Field::RdCosts => self.rd_costs,
            Field::DepreciationAmortization => self.depreciation_amortization,
            Field::CashFlowOperating => self.cash_flow_operating,
            Field::CashFlowInvesting => self.cash_flow_investing,
            Field::CashFlowFinancing => self.cash_flow_financing,
            Field::WipInventory => self.wip_inventory,
            Field::FinishedGoodsInventory => self.finished_goods_inventory,
            Field::RawMaterialsInventory => self.raw_materials_inventory,
            Field::CarUnitsSold => self.car_units_sold,
        }
    }

    /// Mutable access to a numeric field. `Year` has no `f64` slot and
    /// returns `None`.
    pub fn get_mut(&mut self, field: Field) -> Option<&mut f64> {
        let slot = match field {
            Field::Year => return None,
            Field::NetRevenues => &mut self.net_revenues,
            Field::CostOfSales => &mut self.cost_of_sales,
            Field::SgAndACosts => &mut self.sg_and_a_costs,
            Field::RdCosts => &mut self.rd_costs,
            Field::DepreciationAmortization => &mut self.depreciation_amortization,
            Field::CashFlowOperating => &mut self.cash_flow_operating,
            Field::CashFlowInvesting => &mut self.cash_flow_investing,
            Field::CashFlowFinancing => &mut self.cash_flow_financing,
            Field::WipInventory => &mut self.wip_inventory,
            Field::FinishedGoodsInventory => &mut self.finished_goods_inventory,
            Field::RawMaterialsInventory => &mut self.raw_materials_inventory,
            Field::CarUnitsSold => &mut self.car_units_sold,
        };
        Some(slot)
    }

    /// The estimator input row, ordered as [`Field::FEATURES`].
    pub fn features(&self) -> Vec<f64> {
        Field::FEATURES.iter().map(|f| self.get(*f)).collect()
    }
}
