/// Order identifier shared by every line item of one order.
/// Example: `10107`
pub type OrderNumber = i64;
/// Product identifier; `(OrderNumber, ProductCode)` keys a line item.
/// Example: `S10_1678`
pub type ProductCode = String;
/// Customer display name used for per-customer grouping.
/// Example: `Land of Toys Inc.`
pub type CustomerName = String;
/// Normalized (upper-cased, trimmed) country name.
/// Example: `USA`
pub type CountryName = String;
/// Column header name from the source table.
/// Example: `QUANTITYORDERED`
pub type ColumnName = String;
