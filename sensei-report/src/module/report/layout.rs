///! Layout profiles
///!
///! Each profile fixes the canvas size, margins, font sizes and column
///! offsets of one report shape. Column offsets are measured from the left
///! margin and never from content, so long text may run into the next column.

use sensei_common::{SizeVariant, Theme};

/// Horizontal placement of the report title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Where the "Prepared: <date>" label goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePlacement {
    /// Right-aligned on the title line
    Header,
    /// Left margin of the footer line
    Footer,
}

/// Add-ons on the left, bordered summary box on the right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoColumnLayout {
    pub box_width: f32,
    /// Extra height added to `line_height × lines`
    pub box_padding: f32,
    pub box_inset_x: f32,
    pub box_inset_y: f32,
    pub box_stroke: f32,
    /// Extra gap between summary lines inside the box
    pub box_line_gap: f32,
    /// Gap below the "Addons:" label
    pub label_gap: f32,
    pub bullet_indent: f32,
    /// Space below the column that ends lower
    pub block_spacing: f32,
    /// Space between the table header and its rule, and below the rule
    pub header_rule_gap: f32,
    pub header_rule_after: f32,
}

/// Everything in one vertical flow separated by rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleColumnLayout {
    /// Space above and below each rule
    pub rule_gap: f32,
    pub heading_gap: f32,
    pub addon_indent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutFamily {
    TwoColumn(TwoColumnLayout),
    SingleColumn(SingleColumnLayout),
}

/// Pixel sizes of every font a profile uses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizes {
    pub title: f32,
    pub subtitle: f32,
    pub heading: f32,
    pub body: f32,
    pub small: f32,
    pub totals: f32,
    pub footer: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutProfile {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub family: LayoutFamily,
    pub title_align: Align,
    pub date_placement: DatePlacement,
    pub fonts: FontSizes,
    /// Gap below the title and below the subtitle
    pub header_gap: f32,
    /// Vertical nudge of the header date relative to the title
    pub date_nudge: f32,
    /// Extra gap between body text lines
    pub line_gap: f32,
    /// Extra gap between fee rows
    pub row_gap: f32,
    /// Amount column, relative to the left margin
    pub amount_offset: f32,
    /// Note column, relative to the left margin
    pub note_offset: f32,
    /// Fee rows left blank between the table and the totals
    pub totals_gap_rows: f32,
    /// Totals value column, relative to the left margin
    pub totals_value_offset: f32,
    pub totals_line_gap: f32,
    pub rule_width: f32,
    /// Absolute top of the sponsor line
    pub sponsor_y: f32,
    /// Absolute top of the footer line
    pub footer_y: f32,
}

impl LayoutProfile {
    /// US Letter at 300 dpi, two columns
    pub const CLASSIC: LayoutProfile = LayoutProfile {
        name: "classic",
        width: 2550,
        height: 3300,
        margin_x: 260.0,
        margin_y: 260.0,
        family: LayoutFamily::TwoColumn(TwoColumnLayout {
            box_width: 860.0,
            box_padding: 26.0,
            box_inset_x: 18.0,
            box_inset_y: 14.0,
            box_stroke: 3.0,
            box_line_gap: 8.0,
            label_gap: 12.0,
            bullet_indent: 40.0,
            block_spacing: 90.0,
            header_rule_gap: 12.0,
            header_rule_after: 26.0,
        }),
        title_align: Align::Left,
        date_placement: DatePlacement::Header,
        fonts: FontSizes {
            title: 80.0,
            subtitle: 44.0,
            heading: 40.0,
            body: 34.0,
            small: 30.0,
            totals: 40.0,
            footer: 28.0,
        },
        header_gap: 40.0,
        date_nudge: 10.0,
        line_gap: 10.0,
        row_gap: 18.0,
        amount_offset: 900.0,
        note_offset: 1420.0,
        totals_gap_rows: 8.0,
        totals_value_offset: 520.0,
        totals_line_gap: 20.0,
        rule_width: 2.0,
        sponsor_y: 3020.0,
        footer_y: 3140.0,
    };

    /// Compact single column, dark by default
    pub const DARK_SINGLE_COLUMN: LayoutProfile = LayoutProfile {
        name: "dark-single-column",
        width: 1275,
        height: 1650,
        margin_x: 90.0,
        margin_y: 80.0,
        family: LayoutFamily::SingleColumn(SingleColumnLayout {
            rule_gap: 20.0,
            heading_gap: 16.0,
            addon_indent: 24.0,
        }),
        title_align: Align::Left,
        date_placement: DatePlacement::Header,
        fonts: FontSizes {
            title: 56.0,
            subtitle: 32.0,
            heading: 28.0,
            body: 24.0,
            small: 22.0,
            totals: 28.0,
            footer: 18.0,
        },
        header_gap: 24.0,
        date_nudge: 8.0,
        line_gap: 10.0,
        row_gap: 12.0,
        amount_offset: 520.0,
        note_offset: 790.0,
        totals_gap_rows: 0.0,
        totals_value_offset: 300.0,
        totals_line_gap: 14.0,
        rule_width: 2.0,
        sponsor_y: 1530.0,
        footer_y: 1590.0,
    };

    /// Fixed-pixel presentation layout with centred title and dated footer
    pub const MOCKUP: LayoutProfile = LayoutProfile {
        name: "mockup",
        width: 1200,
        height: 1800,
        margin_x: 80.0,
        margin_y: 90.0,
        family: LayoutFamily::SingleColumn(SingleColumnLayout {
            rule_gap: 22.0,
            heading_gap: 18.0,
            addon_indent: 28.0,
        }),
        title_align: Align::Center,
        date_placement: DatePlacement::Footer,
        fonts: FontSizes {
            title: 60.0,
            subtitle: 30.0,
            heading: 28.0,
            body: 24.0,
            small: 22.0,
            totals: 28.0,
            footer: 18.0,
        },
        header_gap: 28.0,
        date_nudge: 0.0,
        line_gap: 10.0,
        row_gap: 14.0,
        amount_offset: 500.0,
        note_offset: 760.0,
        totals_gap_rows: 0.0,
        totals_value_offset: 300.0,
        totals_line_gap: 14.0,
        rule_width: 2.0,
        sponsor_y: 1660.0,
        footer_y: 1730.0,
    };

    /// Pick the profile for a size variant and resolved theme.
    ///
    /// The mockup theme always gets the mockup canvas.
    pub fn select(size: SizeVariant, theme: Theme) -> &'static LayoutProfile {
        match (theme, size) {
            (Theme::Mockup, _) => &Self::MOCKUP,
            (_, SizeVariant::Letter) => &Self::CLASSIC,
            (_, SizeVariant::Compact) => &Self::DARK_SINGLE_COLUMN,
        }
    }

    /// Right edge of the content area
    pub fn content_right(&self) -> f32 {
        self.width as f32 - self.margin_x
    }

    /// Height of one body text line including its gap
    pub fn line_height(&self) -> f32 {
        self.fonts.body + self.line_gap
    }

    /// Height of one fee row
    pub fn row_height(&self) -> f32 {
        self.fonts.body + self.row_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_profile() {
        assert_eq!(LayoutProfile::select(SizeVariant::Letter, Theme::Light).name, "classic");
        assert_eq!(LayoutProfile::select(SizeVariant::Letter, Theme::Dark).name, "classic");
        assert_eq!(
            LayoutProfile::select(SizeVariant::Compact, Theme::Dark).name,
            "dark-single-column"
        );
        assert_eq!(
            LayoutProfile::select(SizeVariant::Compact, Theme::Light).name,
            "dark-single-column"
        );
        assert_eq!(LayoutProfile::select(SizeVariant::Letter, Theme::Mockup).name, "mockup");
        assert_eq!(LayoutProfile::select(SizeVariant::Compact, Theme::Mockup).name, "mockup");
    }

    #[test]
    fn test_profile_dimensions() {
        assert_eq!((LayoutProfile::CLASSIC.width, LayoutProfile::CLASSIC.height), (2550, 3300));
        assert_eq!(
            (LayoutProfile::DARK_SINGLE_COLUMN.width, LayoutProfile::DARK_SINGLE_COLUMN.height),
            (1275, 1650)
        );
        assert_eq!((LayoutProfile::MOCKUP.width, LayoutProfile::MOCKUP.height), (1200, 1800));
    }

    #[test]
    fn test_families() {
        assert!(matches!(LayoutProfile::CLASSIC.family, LayoutFamily::TwoColumn(_)));
        assert!(matches!(LayoutProfile::DARK_SINGLE_COLUMN.family, LayoutFamily::SingleColumn(_)));
        assert!(matches!(LayoutProfile::MOCKUP.family, LayoutFamily::SingleColumn(_)));
        assert_eq!(LayoutProfile::MOCKUP.date_placement, DatePlacement::Footer);
        assert_eq!(LayoutProfile::MOCKUP.title_align, Align::Center);
    }

    #[test]
    fn test_columns_stay_inside_canvas() {
        for profile in [&LayoutProfile::CLASSIC, &LayoutProfile::DARK_SINGLE_COLUMN, &LayoutProfile::MOCKUP] {
            assert!(profile.margin_x + profile.note_offset < profile.content_right());
            assert!(profile.amount_offset < profile.note_offset);
            assert!(profile.sponsor_y < profile.footer_y);
            assert!(profile.footer_y + profile.fonts.footer < profile.height as f32);
        }
    }
}
