use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_last_hostname")]
#[serde(default)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub prefix: String,
    pub postfix: String,
    pub counter: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// prefix + counter left padded with zeros to `fill` digits + postfix
    pub fn formatted_hostname(&self, fill: usize) -> String {
        format!(
            "{}{:0fill$}{}",
            self.prefix,
            self.counter,
            self.postfix,
            fill = fill
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_format() {
        let last = Model {
            id: String::new(),
            prefix: "POLSRV".to_string(),
            postfix: "-d".to_string(),
            counter: 42,
        };
        assert_eq!(last.formatted_hostname(5), "POLSRV00042-d");
        assert_eq!(last.formatted_hostname(1), "POLSRV42-d");
    }
}
