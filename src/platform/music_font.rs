/// Nominal music font size at scale 1.
pub(crate) const MUSIC_FONT_SIZE: f64 = 34.0;

/// Notation symbols, identified by their SMuFL code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicFontSymbol {
    GClef,
    CClef,
    FClef,
    UnpitchedPercussionClef,
    SixStringTabClef,
    FourStringTabClef,

    TimeSig0,
    TimeSig1,
    TimeSig2,
    TimeSig3,
    TimeSig4,
    TimeSig5,
    TimeSig6,
    TimeSig7,
    TimeSig8,
    TimeSig9,
    TimeSigCommon,
    TimeSigCutCommon,

    NoteheadDoubleWhole,
    NoteheadWhole,
    NoteheadHalf,
    NoteheadBlack,
    NoteheadXBlack,
    NoteheadDiamondWhite,
    NoteheadDiamondBlack,
    NoteheadParenthesisLeft,
    NoteheadParenthesisRight,

    SlashHorizontalEnds,
    SlashWhiteWhole,
    SlashHalf,
    SlashDiamond,
    SlashDead,

    Flag8thUp,
    Flag8thDown,
    Flag16thUp,
    Flag16thDown,
    Flag32ndUp,
    Flag32ndDown,
    Flag64thUp,
    Flag64thDown,
    Flag128thUp,
    Flag128thDown,
    Flag256thUp,
    Flag256thDown,

    AccidentalFlat,
    AccidentalNatural,
    AccidentalSharp,
    AccidentalDoubleSharp,
    AccidentalDoubleFlat,

    RestLonga,
    RestDoubleWhole,
    RestWhole,
    RestHalf,
    RestQuarter,
    Rest8th,
    Rest16th,
    Rest32nd,
    Rest64th,
    Rest128th,
    Rest256th,

    Repeat1Bar,
    Repeat2Bars,
}

impl MusicFontSymbol {
    /// SMuFL code point of the symbol.
    pub fn code_point(self) -> u32 {
        use MusicFontSymbol::*;
        match self {
            GClef => 0xE050,
            CClef => 0xE05C,
            FClef => 0xE062,
            UnpitchedPercussionClef => 0xE069,
            SixStringTabClef => 0xE06D,
            FourStringTabClef => 0xE06E,
            TimeSig0 => 0xE080,
            TimeSig1 => 0xE081,
            TimeSig2 => 0xE082,
            TimeSig3 => 0xE083,
            TimeSig4 => 0xE084,
            TimeSig5 => 0xE085,
            TimeSig6 => 0xE086,
            TimeSig7 => 0xE087,
            TimeSig8 => 0xE088,
            TimeSig9 => 0xE089,
            TimeSigCommon => 0xE08A,
            TimeSigCutCommon => 0xE08B,
            NoteheadDoubleWhole => 0xE0A0,
            NoteheadWhole => 0xE0A2,
            NoteheadHalf => 0xE0A3,
            NoteheadBlack => 0xE0A4,
            NoteheadXBlack => 0xE0A9,
            NoteheadDiamondWhite => 0xE0D9,
            NoteheadDiamondBlack => 0xE0DB,
            NoteheadParenthesisLeft => 0xE0F5,
            NoteheadParenthesisRight => 0xE0F6,
            SlashHorizontalEnds => 0xE101,
            SlashWhiteWhole => 0xE102,
            SlashHalf => 0xE103,
            SlashDiamond => 0xE104,
            SlashDead => 0xE106,
            Flag8thUp => 0xE240,
            Flag8thDown => 0xE241,
            Flag16thUp => 0xE242,
            Flag16thDown => 0xE243,
            Flag32ndUp => 0xE244,
            Flag32ndDown => 0xE245,
            Flag64thUp => 0xE246,
            Flag64thDown => 0xE247,
            Flag128thUp => 0xE248,
            Flag128thDown => 0xE249,
            Flag256thUp => 0xE24A,
            Flag256thDown => 0xE24B,
            AccidentalFlat => 0xE260,
            AccidentalNatural => 0xE261,
            AccidentalSharp => 0xE262,
            AccidentalDoubleSharp => 0xE263,
            AccidentalDoubleFlat => 0xE264,
            RestLonga => 0xE4E1,
            RestDoubleWhole => 0xE4E2,
            RestWhole => 0xE4E3,
            RestHalf => 0xE4E4,
            RestQuarter => 0xE4E5,
            Rest8th => 0xE4E6,
            Rest16th => 0xE4E7,
            Rest32nd => 0xE4E8,
            Rest64th => 0xE4E9,
            Rest128th => 0xE4EA,
            Rest256th => 0xE4EB,
            Repeat1Bar => 0xE500,
            Repeat2Bars => 0xE501,
        }
    }

    /// Built-in advance width at scale 1, used for all layout decisions.
    pub fn width(self) -> f64 {
        use MusicFontSymbol::*;
        match self {
            GClef | CClef | FClef => 28.0,
            UnpitchedPercussionClef | SixStringTabClef | FourStringTabClef => 20.0,
            TimeSig0 | TimeSig1 | TimeSig2 | TimeSig3 | TimeSig4 | TimeSig5 | TimeSig6
            | TimeSig7 | TimeSig8 | TimeSig9 => 14.0,
            TimeSigCommon | TimeSigCutCommon => 16.0,
            NoteheadDoubleWhole => 18.0,
            NoteheadWhole => 14.0,
            NoteheadHalf | NoteheadBlack | NoteheadXBlack | NoteheadDiamondWhite
            | NoteheadDiamondBlack => 10.0,
            NoteheadParenthesisLeft | NoteheadParenthesisRight => 4.0,
            SlashHorizontalEnds | SlashDiamond | SlashDead => 20.0,
            SlashWhiteWhole | SlashHalf => 14.0,
            Flag8thUp | Flag8thDown | Flag16thUp | Flag16thDown | Flag32ndUp | Flag32ndDown
            | Flag64thUp | Flag64thDown | Flag128thUp | Flag128thDown | Flag256thUp
            | Flag256thDown => 9.0,
            AccidentalFlat => 7.0,
            AccidentalNatural => 6.0,
            AccidentalSharp | AccidentalDoubleSharp => 8.0,
            AccidentalDoubleFlat => 12.0,
            RestLonga | RestDoubleWhole | RestWhole | RestHalf => 10.0,
            RestQuarter | Rest8th => 8.0,
            Rest16th | Rest32nd | Rest64th | Rest128th | Rest256th => 10.0,
            Repeat1Bar => 20.0,
            Repeat2Bars => 28.0,
        }
    }

    /// Digit symbol for time signatures; digits above 9 map to 9.
    pub fn time_signature_digit(digit: u32) -> Self {
        use MusicFontSymbol::*;
        match digit {
            0 => TimeSig0,
            1 => TimeSig1,
            2 => TimeSig2,
            3 => TimeSig3,
            4 => TimeSig4,
            5 => TimeSig5,
            6 => TimeSig6,
            7 => TimeSig7,
            8 => TimeSig8,
            _ => TimeSig9,
        }
    }
}
