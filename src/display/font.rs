//! Built-in 8x8 bitmap font
//!
//! Glyphs for ASCII 32..=127 are stored as 8 row bytes each (bit 0 is the
//! leftmost column), packed five characters per big-endian 32-bit word in a
//! base-85 alphabet of printable characters without `"` and `\`.

use std::sync::OnceLock;

use super::pixel::Pixel;
use super::sprite::Sprite;

pub const GLYPH_WIDTH: i32 = 8;
pub const GLYPH_HEIGHT: i32 = 8;

/// Columns between tab stops
pub const TAB_COLUMNS: i32 = 4;

const FIRST_CHAR: u32 = 32;
const LAST_CHAR: u32 = 127;
const GLYPHS_PER_ROW: i32 = 16;

/// Font sheet size in pixels
pub const SHEET_WIDTH: u32 = 128;
pub const SHEET_HEIGHT: u32 = 48;

const PACKED: &str = concat!(
    "!!!!!!!!!!)f(pv)_ZCR3EvP9!!!!!3F%&DJn:2d%rGd81IV_(!,Sh&%vbwM+'^fT5$;cT#rQ01!!!!!",
    ")`rUR#s3>L#s3>e)`rUL!,pAp5E#Rp!#::$%m+,:!!!!!!#:9@!!!!b!!!!!!!!!!!#:9:@pbF,#r5n,",
    "6&BZ^EgE77%m=]T%m-@$+_$Kk#wBJE+_$Kk1KccN4(:*UJm[+J67Ew_1KccN+!RLg2H`(Q6<Pw2%m+PF",
    "+_$Tp2H`(Q+_$U:1Hm:#!#:9:!#:9:!#:9:!#:9@)`rUO#s3>L!!$5b!(`Hb#s3?')`rUL+_$Kg%ki^:",
    "6&BsfIOQ<j%o&3^6<Q)s6B#MmBpG8.5E#[v#)lYs,$]aDBk;a3Jov2r)/OeSJov2r)(Z:M5E#[vG)Ug#",
    "2H`iP2H`hg+YkHe%m,1XHWDi+2H`(QC5c&D3K.T&&iF5C8W8-NAu=FQDM`kTAsUa-G)9^]+'a<;An?<-",
    "6B#Mm#rQT=+_$U/5!%@_6B#Mm3K.T&+_#%34'<UV6;o:Q%m,1X2H`iD2Ha6s2H`iD2FIt*As1#cJu6C'",
    "As/E;+'a;-2H`i/%m,1XJs)3N:Q0dT+Y3hR#rR,L!uU0O1PS.H+[-a3)b5;q$UQc5!!!!!!!!!!!!!%!",
    "%m+uR!!!!!!!#'q5w8(W$7mBtBpG,*!!#'t#$Dvw4'!%N2HbpL!!#'t67Et-+'^!4#rQT=!!%oo2IoL8",
    "$7o*)BpH[V%kidH%m,1X1F=f^1KdM,$7pew+_AY3&MbcT%m,1X!!#i*JstOq!!#*u2H`hg!!#'t2H`(Q",
    "!!$*oBl.E1!!%oo2IoM<!!$*wBf0dH!!$2d+^^[:$Sko+%pO5s!!#h32HbpL!!#h32FIt*!!%NFJv(@W",
    "!!%Mg+'a;-!!#h32IoL8!!$6%%op2>4#.4$%m-*s)b5)k)b5)k$8N$$%m+AAEFAiw!!!!!!!!!!!!!!!",
);

#[inline]
fn digit(c: u8) -> u32 {
    let mut d = c.saturating_sub(33) as u32;
    if c > b'"' {
        d -= 1;
    }
    if c > b'\\' {
        d -= 1;
    }
    d
}

/// Unpack the glyph table into raw row bytes
fn unpack() -> Vec<u8> {
    PACKED
        .as_bytes()
        .chunks_exact(5)
        .flat_map(|chunk| {
            let word = chunk
                .iter()
                .fold(0u32, |acc, &c| acc.wrapping_mul(85).wrapping_add(digit(c)));
            word.to_be_bytes()
        })
        .collect()
}

fn decode_sheet() -> Sprite {
    let rows = unpack();
    let mut sheet = Sprite::filled(SHEET_WIDTH, SHEET_HEIGHT, Pixel::BLANK);
    for (glyph, bytes) in rows.chunks_exact(GLYPH_HEIGHT as usize).enumerate() {
        let ox = (glyph as i32 % GLYPHS_PER_ROW) * GLYPH_WIDTH;
        let oy = (glyph as i32 / GLYPHS_PER_ROW) * GLYPH_HEIGHT;
        for (row, &bits) in bytes.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits >> col & 1 != 0 {
                    sheet.set_pixel(ox + col, oy + row as i32, Pixel::WHITE);
                }
            }
        }
    }
    sheet
}

/// The decoded 128x48 font sheet, built on first use
pub fn font_sheet() -> &'static Sprite {
    static SHEET: OnceLock<Sprite> = OnceLock::new();
    SHEET.get_or_init(decode_sheet)
}

/// Top-left of a character's cell in the sheet; `None` outside 32..=127
pub fn glyph_origin(c: char) -> Option<(i32, i32)> {
    let code = c as u32;
    if !(FIRST_CHAR..=LAST_CHAR).contains(&code) {
        return None;
    }
    let i = (code - FIRST_CHAR) as i32;
    Some((
        (i % GLYPHS_PER_ROW) * GLYPH_WIDTH,
        (i / GLYPHS_PER_ROW) * GLYPH_HEIGHT,
    ))
}

/// Cell position of every drawable character, in glyph units
///
/// Handles `\n` and tab stops; characters outside the table still take a cell.
pub fn layout(text: &str, mut f: impl FnMut(char, i32, i32)) {
    let mut col = 0;
    let mut row = 0;
    for c in text.chars() {
        match c {
            '\n' => {
                col = 0;
                row += 1;
            },
            '\t' => col = (col / TAB_COLUMNS + 1) * TAB_COLUMNS,
            _ => {
                f(c, col, row);
                col += 1;
            },
        }
    }
}

/// Unscaled pixel extent of `text`
pub fn text_size(text: &str) -> (i32, i32) {
    if text.is_empty() {
        return (0, 0);
    }
    let mut cols = 0;
    let mut col = 0;
    let mut rows = 1;
    for c in text.chars() {
        match c {
            '\n' => {
                col = 0;
                rows += 1;
            },
            '\t' => col = (col / TAB_COLUMNS + 1) * TAB_COLUMNS,
            _ => col += 1,
        }
        cols = cols.max(col);
    }
    (cols * GLYPH_WIDTH, rows * GLYPH_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph_rows(c: char) -> Vec<String> {
        let sheet = font_sheet();
        let (ox, oy) = glyph_origin(c).unwrap();
        (0..GLYPH_HEIGHT)
            .map(|y| {
                (0..GLYPH_WIDTH)
                    .map(|x| if sheet.get_pixel(ox + x, oy + y).a == 255 { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_packed_table_size() {
        assert_eq!(PACKED.len(), 960);
        assert_eq!(unpack().len(), 96 * 8);
    }

    #[test]
    fn test_glyph_a_shape() {
        assert_eq!(
            glyph_rows('A'),
            vec![
                "..##....",
                ".####...",
                "##..##..",
                "##..##..",
                "######..",
                "##..##..",
                "##..##..",
                "........",
            ]
        );
    }

    #[test]
    fn test_space_is_empty() {
        assert!(glyph_rows(' ').iter().all(|r| r == "........"));
    }

    #[test]
    fn test_glyph_origin_cells() {
        assert_eq!(glyph_origin(' '), Some((0, 0)));
        assert_eq!(glyph_origin('A'), Some((8, 16)));
        assert_eq!(glyph_origin('\u{7f}'), Some((120, 40)));
        assert_eq!(glyph_origin('\u{1f}'), None);
        assert_eq!(glyph_origin('é'), None);
    }

    #[test]
    fn test_text_size() {
        assert_eq!(text_size(""), (0, 0));
        assert_eq!(text_size("abc"), (24, 8));
        assert_eq!(text_size("ab\nlonger"), (48, 16));
        assert_eq!(text_size("a\tb"), (40, 8));
    }

    #[test]
    fn test_layout_tabs_and_newlines() {
        let mut cells = Vec::new();
        layout("ab\tc\nd", |c, x, y| cells.push((c, x, y)));
        assert_eq!(cells, vec![('a', 0, 0), ('b', 1, 0), ('c', 4, 0), ('d', 0, 1)]);
    }
}
