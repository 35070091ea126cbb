/// Header text exactly as it appears in a source table (after header cleaning).
/// Examples: `Capacity (MW)`, `Name of the Developer`, `S. No`
pub type HeaderName = String;
/// Candidate header spelling used by the column resolver.
/// Examples: `Capacity (MW)`, `Capacity`, `Developer`
pub type HeaderCandidate = &'static str;
/// Checkpoint (taxonomy group) label.
/// Examples: `Allocation`, `Connectivity`, `Financial Closure`
pub type GroupName = String;
/// Milestone (taxonomy item) label.
/// Examples: `LOI`, `LOA`, `Applied`
pub type ItemName = String;
/// Worksheet name inside a workbook.
/// Examples: `Sheet1`, `Under Construction Projects`
pub type SheetName = String;
/// Indian state or union territory label as written in the source.
/// Examples: `Rajasthan`, `Gujarat`
pub type StateName = String;
/// Operator-facing notice text.
/// Examples: `projects input not found (tried: report.xlsx)`
pub type LogMessage = String;
