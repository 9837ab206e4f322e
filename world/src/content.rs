//! Curated content shipped with the game and the default picture sets.

use train_match_core::{ImageHandle, Symbol, SymbolMapping};

type Table = &'static [(&'static str, &'static [&'static str])];

const EXAMPLE_MATH: Table = &[
    ("12", &["2*6", "12", "3*4"]),
    ("5", &["5*1", "3+2", "8-3"]),
    ("15", &["20-5", "3*5", "60/4"]),
    ("23", &["20+3", "4*5+3", "26-3"]),
    ("100", &["50+50", "10^2", "99+1"]),
];

// Addition and subtraction within 10.
const CLASS1_MATH: Table = &[
    ("2", &["1+1", "2-0", "2+0", "3-1", "4-2", "5-3", "6-4", "7-5"]),
    ("5", &["2+3", "1+4", "5+0", "6-1", "7-2", "8-3", "9-4", "10-5"]),
    ("7", &["0+7", "2+5", "10-3", "9-2", "3+4", "1+6", "8-1", "7-0"]),
    ("9", &["4+5", "3+6", "2+7", "1+8", "0+9", "10-1", "9-0", "6+3"]),
    ("10", &["5+5", "4+6", "3+7", "2+8", "1+9", "0+10", "10-0", "10+0"]),
];

// Addition and subtraction within 100, multiplication and division within 50.
const CLASS2_MATH: Table = &[
    ("10", &["2*5", "1*10", "20/2", "40/4", "50/5", "30/3", "99-89", "45-35"]),
    ("20", &["15+5", "20+0", "28-8", "22-2", "2*10", "4*5", "40/2", "1*20"]),
    ("40", &["15+25", "20+20", "48-8", "42-2", "2*20", "4*10", "8*5", "1*40"]),
    ("80", &["40+40", "28+52", "35+45", "9+71", "91-11", "100-20", "94-14", "76+4"]),
    ("100", &["50+50", "11+89", "23+77", "13+87", "43+57", "34+66", "96+4", "18+82"]),
];

// All four operations within 100.
const CLASS3_MATH: Table = &[
    ("20", &["80/4", "100/5", "40/2", "2*10", "100-80"]),
    ("50", &["5*10", "100/2", "2*25", "50/1", "50*1"]),
    ("60", &["3*20", "30*2", "36+24", "6*10", "99-39"]),
    ("100", &["2*50", "4*25", "100/1", "64+36", "20*5"]),
];

// Within 100 plus powers.
const CLASS4_MATH: Table = &[
    ("25", &["5^2", "100/4", "25^1", "75/3", "50/2"]),
    ("32", &["2^5", "4*8", "2*16", "28+4", "64/2"]),
    ("81", &["9^2", "3^4", "9*9", "81^1", "27*3"]),
    ("100", &["10^2", "4*25", "2*50", "1*100", "100/1"]),
];

const CLASS45_MATH: Table = &[
    ("120", &["2*60", "4*30", "240/2", "12*10"]),
    ("150", &["75*2", "5*30", "15*10", "300/2"]),
    ("400", &["4*100", "2*200", "40*10", "20^2", "20*20"]),
    ("500", &["2*250", "4*125", "50*10", "20*25"]),
];

// Beyond 100, multiplying by a single digit.
const CLASS5_MATH: Table = &[
    ("200", &["2*100", "4*50", "8*25", "40*5", "1000/5"]),
    ("600", &["6*100", "3*200", "4*150", "8*75", "40*15"]),
    ("800", &["8*100", "4*200", "2*400", "20*40", "10*80"]),
    ("1000", &["2*500", "4*250", "8*125"]),
];

#[derive(Clone, Copy)]
enum Form {
    Word(&'static str),
    Picture(&'static str),
}

impl Form {
    fn symbol(self) -> Symbol {
        match self {
            Self::Word(text) => Symbol::text(text),
            Self::Picture(key) => Symbol::image(ImageHandle::new(key)),
        }
    }
}

const EXAMPLE_ENGLISH: [(Form, Form); 4] = [
    (Form::Word("carrot"), Form::Picture("Images/carrot2")),
    (Form::Picture("Images/cherries2"), Form::Word("cherries")),
    (Form::Word("watermelon"), Form::Picture("Images/watermelon2")),
    (Form::Word("grapes"), Form::Picture("Images/grapes2")),
];

/// Pictures offered as station symbols by default.
pub(crate) const DEFAULT_PICTURES: [&str; 11] = [
    "Images/carrot2",
    "Images/cherries2",
    "Images/grapes2",
    "Images/watermelon2",
    "Images/raspberry2",
    "Images/gamepad2",
    "Images/pyramid2",
    "Images/rocket2",
    "Images/skateboard2",
    "Images/spinner",
    "Images/gift2",
];

/// Animal traveller pictures.
pub(crate) const ANIMAL_PASSENGERS: [&str; 5] = [
    "Images/Bee2",
    "Images/Monkey2",
    "Images/Mouse2",
    "Images/cat",
    "Images/Sloth",
];

/// Human traveller pictures.
pub(crate) const HUMAN_PASSENGERS: [&str; 7] = [
    "Images/businessman2",
    "Images/doctor2",
    "Images/girl22",
    "Images/man22",
    "Images/man_2",
    "Images/student2",
    "Images/woman2",
];

/// Driver pictures; the last one is selected by default.
pub(crate) const DRIVERS: [&str; 2] = ["Images/girl22", "Images/driver2"];

fn from_table(table: Table) -> Vec<SymbolMapping> {
    table
        .iter()
        .filter_map(|(canonical, equivalents)| {
            SymbolMapping::from_text(canonical, equivalents).ok()
        })
        .collect()
}

/// Mixed arithmetic sampler.
#[must_use]
pub(crate) fn example_math() -> Vec<SymbolMapping> {
    from_table(EXAMPLE_MATH)
}

/// Grades 1-3, easy.
#[must_use]
pub(crate) fn class1_math() -> Vec<SymbolMapping> {
    from_table(CLASS1_MATH)
}

/// Grades 1-3, medium.
#[must_use]
pub(crate) fn class2_math() -> Vec<SymbolMapping> {
    from_table(CLASS2_MATH)
}

/// Grades 1-3, hard.
#[must_use]
pub(crate) fn class3_math() -> Vec<SymbolMapping> {
    from_table(CLASS3_MATH)
}

/// Grades 4-5, easy.
#[must_use]
pub(crate) fn class4_math() -> Vec<SymbolMapping> {
    from_table(CLASS4_MATH)
}

/// Grades 4-5, medium.
#[must_use]
pub(crate) fn class45_math() -> Vec<SymbolMapping> {
    from_table(CLASS45_MATH)
}

/// Grades 4-5, hard.
#[must_use]
pub(crate) fn class5_math() -> Vec<SymbolMapping> {
    from_table(CLASS5_MATH)
}

/// Words paired with pictures, in both directions.
#[must_use]
pub(crate) fn example_english() -> Vec<SymbolMapping> {
    EXAMPLE_ENGLISH
        .iter()
        .filter_map(|&(canonical, equivalent)| {
            SymbolMapping::new(canonical.symbol(), vec![equivalent.symbol()]).ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curated_row_survives_construction() {
        assert_eq!(example_math().len(), EXAMPLE_MATH.len());
        assert_eq!(class1_math().len(), CLASS1_MATH.len());
        assert_eq!(class2_math().len(), CLASS2_MATH.len());
        assert_eq!(class3_math().len(), CLASS3_MATH.len());
        assert_eq!(class4_math().len(), CLASS4_MATH.len());
        assert_eq!(class45_math().len(), CLASS45_MATH.len());
        assert_eq!(class5_math().len(), CLASS5_MATH.len());
        assert_eq!(example_english().len(), EXAMPLE_ENGLISH.len());
    }

    #[test]
    fn english_pairs_words_with_pictures() {
        let english = example_english();
        assert_eq!(english[0].canonical(), &Symbol::text("carrot"));
        assert_eq!(
            english[0].equivalents(),
            &[Symbol::image(ImageHandle::new("Images/carrot2"))]
        );
        assert_eq!(english[1].equivalents(), &[Symbol::text("cherries")]);
    }
}
