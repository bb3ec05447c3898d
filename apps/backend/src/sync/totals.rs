use serde::Serialize;

use crate::repos::scores::Score;

/// Column sums over all rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub tsim: i64,
    pub jason: i64,
    pub wai: i64,
    pub mum_soup: i64,
}

pub fn totals<'a>(scores: impl IntoIterator<Item = &'a Score>) -> Totals {
    scores.into_iter().fold(Totals::default(), |acc, s| Totals {
        tsim: acc.tsim + i64::from(s.tsim),
        jason: acc.jason + i64::from(s.jason),
        wai: acc.wai + i64::from(s.wai),
        mum_soup: acc.mum_soup + i64::from(s.mum_soup),
    })
}
