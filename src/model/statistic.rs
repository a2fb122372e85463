use std::collections::BTreeMap;

/// Open parameter bag for a statistic.
///
/// The statistic engines consuming these are external; their parameter
/// schemas are not fixed here, so values stay dynamically typed.
pub type StatisticParams = BTreeMap<String, serde_json::Value>;

/// A statistical treatment attached to a resolved metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistic {
    pub name: String,
    pub params: StatisticParams,
}

impl Statistic {
    pub fn new(name: impl Into<String>, params: StatisticParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}
