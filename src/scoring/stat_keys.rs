//! Platform stat-id tables.
//!
//! ESPN and Yahoo publish stats and scoring rules by numeric id. Both are
//! mapped onto the canonical keys used by [`super::ScoringSettings`]; ids
//! that have no counterpart return `None` and are ignored.

/// ESPN `statId` → canonical key.
pub fn espn_stat_key(stat_id: u16) -> Option<&'static str> {
    let key = match stat_id {
        3 => "pass_yd",
        4 => "pass_td",
        19 => "pass_2pt",
        20 => "pass_int",
        24 => "rush_yd",
        25 => "rush_td",
        26 => "rush_2pt",
        42 => "rec_yd",
        43 => "rec_td",
        44 => "rec_2pt",
        53 => "rec",
        72 => "fum_lost",
        74 => "fgm_50p",
        77 => "fgm_40_49",
        80 => "fgm_0_39",
        85 => "fgmiss",
        86 => "xpm",
        88 => "xpmiss",
        89 => "pts_allow_0",
        90 => "pts_allow_1_6",
        91 => "pts_allow_7_13",
        92 => "pts_allow_14_20",
        93 => "blk_kick_ret_td",
        94 => "def_td",
        95 => "int",
        96 => "fum_rec",
        97 => "blk_kick",
        98 => "safe",
        99 => "sack",
        101 => "kr_td",
        102 => "pr_td",
        124 => "pts_allow_28_34",
        125 => "pts_allow_35p",
        _ => return None,
    };
    Some(key)
}

/// Yahoo `stat_id` → canonical key.
pub fn yahoo_stat_key(stat_id: u16) -> Option<&'static str> {
    let key = match stat_id {
        4 => "pass_yd",
        5 => "pass_td",
        6 => "pass_int",
        9 => "rush_yd",
        10 => "rush_td",
        11 => "rec",
        12 => "rec_yd",
        13 => "rec_td",
        15 => "st_td",
        16 => "pass_2pt",
        18 => "fum_lost",
        19 => "fgm_0_19",
        20 => "fgm_20_29",
        21 => "fgm_30_39",
        22 => "fgm_40_49",
        23 => "fgm_50p",
        24 => "fgmiss_0_19",
        25 => "fgmiss_20_29",
        26 => "fgmiss_30_39",
        27 => "fgmiss_40_49",
        28 => "fgmiss_50p",
        29 => "xpm",
        30 => "xpmiss",
        31 => "pts_allow",
        32 => "sack",
        33 => "int",
        34 => "fum_rec",
        35 => "def_td",
        36 => "safe",
        37 => "blk_kick",
        49 => "kr_td",
        50 => "pts_allow_0",
        51 => "pts_allow_1_6",
        52 => "pts_allow_7_13",
        53 => "pts_allow_14_20",
        54 => "pts_allow_21_27",
        55 => "pts_allow_28_34",
        56 => "pts_allow_35p",
        57 => "fum_rec_td",
        _ => return None,
    };
    Some(key)
}
