use crate::engine::{RawForm, TeamCodes};
use crate::ev::types::Side;

/// Which part of the wager/game state a form row edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Slug,
    Side,
    FeeCost,
    Quarter,
    Clock,
    HomeScore,
    AwayScore,
    Possession,
    Yardline,
    Down,
    YdsToGo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Text,
    UInt,
    Decimal,
    Clock,
    /// Fixed choices; the selected index is stored in `FormField::choice`.
    Enum(Vec<String>),
}

impl FieldType {
    /// Whether `c` may be typed into a field of this type.
    pub fn accepts(&self, c: char) -> bool {
        match self {
            FieldType::Text => !c.is_control(),
            // '-' is let through so clamping, not the keyboard, decides.
            FieldType::UInt => c.is_ascii_digit() || c == '-',
            FieldType::Decimal => c.is_ascii_digit() || c == '.' || c == '-',
            FieldType::Clock => c.is_ascii_digit() || c == ':',
            FieldType::Enum(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub key: FieldKey,
    pub label: String,
    pub value: String,
    pub field_type: FieldType,
    pub choice: usize,
    pub hint: Option<String>,
    pub error: Option<String>,
}

impl FormField {
    fn input(key: FieldKey, label: &str, value: String, field_type: FieldType) -> Self {
        Self {
            key,
            label: label.to_string(),
            value,
            field_type,
            choice: 0,
            hint: None,
            error: None,
        }
    }

    fn choice(key: FieldKey, label: &str, options: Vec<String>, choice: usize) -> Self {
        let value = options.get(choice).cloned().unwrap_or_default();
        Self {
            key,
            label: label.to_string(),
            value,
            field_type: FieldType::Enum(options),
            choice,
            hint: None,
            error: None,
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.field_type, FieldType::Enum(_))
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub editing: bool,
    pub edit_buffer: String,
    pub teams: TeamCodes,
    /// Slug used for team labels while the slug row is blank.
    pub fallback_slug: String,
}

fn side_options(teams: &TeamCodes) -> Vec<String> {
    vec![
        format!("{} wins (home_yes)", teams.home),
        format!("{} does not win (home_no)", teams.home),
    ]
}

fn possession_options(teams: &TeamCodes) -> Vec<String> {
    vec![format!("{} (home)", teams.home), format!("{} (away)", teams.away)]
}

impl FormState {
    pub fn new(raw: &RawForm, fallback_slug: &str) -> Self {
        let teams = TeamCodes::from_slug_or_generic(&raw.slug);
        let side_choice = match raw.side {
            Side::HomeYes => 0,
            Side::HomeNo => 1,
        };
        let possession_choice = if raw.home_has_ball { 0 } else { 1 };

        let fields = vec![
            FormField::input(FieldKey::Slug, "Slug", raw.slug.clone(), FieldType::Text),
            FormField::choice(FieldKey::Side, "Side", side_options(&teams), side_choice),
            FormField::input(FieldKey::FeeCost, "Fee cost", raw.fee_cost.clone(), FieldType::Decimal),
            FormField::input(FieldKey::Quarter, "Quarter", raw.quarter.clone(), FieldType::UInt),
            FormField::input(FieldKey::Clock, "Clock (MM:SS)", raw.clock.clone(), FieldType::Clock),
            FormField::input(FieldKey::HomeScore, "Home score", raw.home_score.clone(), FieldType::UInt),
            FormField::input(FieldKey::AwayScore, "Away score", raw.away_score.clone(), FieldType::UInt),
            FormField::choice(FieldKey::Possession, "Possession", possession_options(&teams), possession_choice),
            FormField::input(FieldKey::Yardline, "Yardline", raw.yardline.clone(), FieldType::Text),
            FormField::input(FieldKey::Down, "Down", raw.down.clone(), FieldType::UInt),
            FormField::input(FieldKey::YdsToGo, "To go", raw.ydstogo.clone(), FieldType::UInt),
        ];

        let mut form = Self {
            fields,
            selected_field: 0,
            editing: false,
            edit_buffer: String::new(),
            teams,
            fallback_slug: fallback_slug.to_string(),
        };
        form.relabel();
        form
    }

    pub fn field(&self, key: FieldKey) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn field_mut(&mut self, key: FieldKey) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    fn text(&self, key: FieldKey) -> String {
        self.field(key).map(|f| f.value.clone()).unwrap_or_default()
    }

    fn choice(&self, key: FieldKey) -> usize {
        self.field(key).map_or(0, |f| f.choice)
    }

    /// Snapshot of the form for the normalizer.
    pub fn to_raw(&self) -> RawForm {
        RawForm {
            slug: self.text(FieldKey::Slug),
            side: if self.choice(FieldKey::Side) == 0 { Side::HomeYes } else { Side::HomeNo },
            fee_cost: self.text(FieldKey::FeeCost),
            quarter: self.text(FieldKey::Quarter),
            clock: self.text(FieldKey::Clock),
            home_score: self.text(FieldKey::HomeScore),
            away_score: self.text(FieldKey::AwayScore),
            home_has_ball: self.choice(FieldKey::Possession) == 0,
            yardline: self.text(FieldKey::Yardline),
            down: self.text(FieldKey::Down),
            ydstogo: self.text(FieldKey::YdsToGo),
        }
    }

    /// Re-derive team codes from the slug and refresh team-dependent labels.
    fn relabel(&mut self) {
        let slug = self.text(FieldKey::Slug);
        let slug = if slug.trim().is_empty() { self.fallback_slug.clone() } else { slug };
        self.teams = TeamCodes::from_slug_or_generic(&slug);
        let teams = self.teams.clone();
        for field in &mut self.fields {
            match field.key {
                FieldKey::Side => {
                    let options = side_options(&teams);
                    field.value = options[field.choice.min(1)].clone();
                    field.field_type = FieldType::Enum(options);
                }
                FieldKey::Possession => {
                    let options = possession_options(&teams);
                    field.value = options[field.choice.min(1)].clone();
                    field.field_type = FieldType::Enum(options);
                }
                FieldKey::HomeScore => field.label = format!("Home score ({})", teams.home),
                FieldKey::AwayScore => field.label = format!("Away score ({})", teams.away),
                FieldKey::Yardline => {
                    field.hint = Some(format!("e.g. {} 35 or {} 20", teams.home, teams.away));
                }
                _ => {}
            }
        }
    }

    pub fn select_next(&mut self) {
        if !self.editing && self.selected_field + 1 < self.fields.len() {
            self.selected_field += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if !self.editing {
            self.selected_field = self.selected_field.saturating_sub(1);
        }
    }

    /// Start editing the selected row. Enum rows cycle instead.
    pub fn begin_edit(&mut self) {
        let Some(field) = self.fields.get(self.selected_field) else { return };
        if field.is_enum() {
            self.cycle(1);
            return;
        }
        self.edit_buffer = field.value.clone();
        self.editing = true;
    }

    pub fn push_char(&mut self, c: char) {
        if !self.editing {
            return;
        }
        let Some(field) = self.fields.get(self.selected_field) else { return };
        if field.field_type.accepts(c) {
            self.edit_buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.editing {
            self.edit_buffer.pop();
        }
    }

    /// Write the buffer into the field. Empty input is kept as empty; the
    /// default is substituted at submission.
    pub fn commit_edit(&mut self) {
        if !self.editing {
            return;
        }
        self.editing = false;
        let buffer = std::mem::take(&mut self.edit_buffer);
        let Some(field) = self.fields.get_mut(self.selected_field) else { return };
        field.value = buffer.trim().to_string();
        field.error = None;
        if field.key == FieldKey::Slug {
            self.relabel();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    /// Step the selected enum row forward (`1`) or back (`-1`), wrapping.
    pub fn cycle(&mut self, dir: i32) {
        if self.editing {
            return;
        }
        let Some(field) = self.fields.get_mut(self.selected_field) else { return };
        let FieldType::Enum(options) = &field.field_type else { return };
        if options.is_empty() {
            return;
        }
        let n = options.len() as i32;
        let next = (field.choice as i32 + dir).rem_euclid(n) as usize;
        field.choice = next;
        field.value = options[next].clone();
    }

    pub fn set_error(&mut self, key: FieldKey, message: Option<String>) {
        if let Some(field) = self.field_mut(key) {
            field.error = message;
        }
    }

    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.error = None;
        }
    }
}
