use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{error, warn};
use ratatui::{DefaultTerminal, Frame, widgets::ListState};

use crate::clock::Clock;
use crate::config::{NOTIFICATION_TTL, TICK_RATE};
use crate::db::DatabaseOps;
use crate::error::CellkeeperError;
use crate::event::{AppEvent, poll_event};
use crate::models::{
    Battery, BatteryId, BatteryStatus, Language, Lookup, LookupId, LookupKind, NewBattery,
    ResistanceRecord, Settings, Timestamp, UsageRecord,
};
use crate::report::{BatteryReport, FleetSummary, build_report};
use crate::ui::{
    render_battery_modal, render_detail, render_inventory, render_lookup_modal, render_lookups,
    render_resistance_modal, render_settings_modal, render_stats,
};
use crate::validation::{
    parse_capacity, parse_cells, parse_resistance, validate_alert_days, validate_color,
    validate_label, validate_new_lookup_label, validate_update_lookup_label,
};

/// The current view/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Inventory,
    Detail,
    Lookups,
    Stats,
}

/// The current modal state - only one modal can be open at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    None,
    NewBattery,
    NewLookup,
    Resistance,
    Settings,
}

/// Severity of a footer notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A transient message shown in the footer
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub shown_at: Instant,
}

/// Which field is focused in the new battery modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatteryField {
    #[default]
    Label,
    Brand,
    Series,
    Type,
    Cells,
    Capacity,
}

impl BatteryField {
    pub fn next(&self) -> Self {
        match self {
            BatteryField::Label => BatteryField::Brand,
            BatteryField::Brand => BatteryField::Series,
            BatteryField::Series => BatteryField::Type,
            BatteryField::Type => BatteryField::Cells,
            BatteryField::Cells => BatteryField::Capacity,
            BatteryField::Capacity => BatteryField::Label,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            BatteryField::Label => BatteryField::Capacity,
            BatteryField::Brand => BatteryField::Label,
            BatteryField::Series => BatteryField::Brand,
            BatteryField::Type => BatteryField::Series,
            BatteryField::Cells => BatteryField::Type,
            BatteryField::Capacity => BatteryField::Cells,
        }
    }

    /// Picker fields choose from a lookup list instead of taking text
    pub fn picker_kind(&self) -> Option<LookupKind> {
        match self {
            BatteryField::Brand => Some(LookupKind::Brand),
            BatteryField::Series => Some(LookupKind::Series),
            BatteryField::Type => Some(LookupKind::Type),
            _ => None,
        }
    }
}

/// Input state for the battery modal
#[derive(Debug, Clone, Default)]
pub struct BatteryForm {
    /// Battery being edited, `None` when adding
    pub editing: Option<BatteryId>,
    pub field: BatteryField,
    pub label: String,
    pub brand_idx: usize,
    pub series_idx: usize,
    pub type_idx: usize,
    pub cells: String,
    pub capacity: String,
}

/// Which field is focused in the new lookup modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupField {
    #[default]
    Label,
    Color,
}

#[derive(Debug, Clone, Default)]
pub struct LookupForm {
    /// Entry being renamed, `None` when adding
    pub editing: Option<LookupId>,
    pub field: LookupField,
    pub label: String,
    pub color: String,
}

/// Which field is focused in the settings modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    AlertDays,
    Language,
    Theme,
}

impl SettingsField {
    pub fn next(&self) -> Self {
        match self {
            SettingsField::AlertDays => SettingsField::Language,
            SettingsField::Language => SettingsField::Theme,
            SettingsField::Theme => SettingsField::AlertDays,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SettingsField::AlertDays => SettingsField::Theme,
            SettingsField::Language => SettingsField::AlertDays,
            SettingsField::Theme => SettingsField::Language,
        }
    }
}

/// State for the settings modal
#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    pub field: SettingsField,
    pub editing_value: String,
    pub editing: Settings,
}

/// Which list has focus in the detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailPane {
    #[default]
    History,
    Resistance,
}

/// State for the battery detail view
#[derive(Debug, Default)]
pub struct DetailState {
    pub report: Option<BatteryReport>,
    pub records: Vec<UsageRecord>,
    pub resistance: Vec<ResistanceRecord>,
    pub pane: DetailPane,
    pub records_state: ListState,
    pub resistance_state: ListState,
}

/// Enabled lookups offered by the battery form
#[derive(Debug, Default)]
pub struct Pickers {
    pub brands: Vec<Lookup>,
    pub series: Vec<Lookup>,
    pub types: Vec<Lookup>,
}

impl Pickers {
    pub fn get(&self, kind: LookupKind) -> &[Lookup] {
        match kind {
            LookupKind::Brand => &self.brands,
            LookupKind::Series => &self.series,
            LookupKind::Type => &self.types,
        }
    }
}

/// The main application state
pub struct App<D: DatabaseOps, C: Clock> {
    pub running: bool,
    pub view: View,
    pub modal: ModalState,
    pub settings: Settings,

    // Inventory view state
    pub reports: Vec<BatteryReport>,
    pub summary: FleetSummary,
    pub inventory_state: ListState,

    pub detail: DetailState,

    // Lookups view state
    pub lookup_kind: LookupKind,
    pub lookups: Vec<Lookup>,
    pub lookup_state: ListState,

    // Modal state
    pub pickers: Pickers,
    pub battery_form: BatteryForm,
    pub lookup_form: LookupForm,
    pub resistance_input: String,
    pub settings_state: SettingsState,

    pub notification: Option<Notification>,

    db: D,
    clock: C,
}

impl<D: DatabaseOps, C: Clock> App<D, C> {
    /// Create a new application instance over an open database
    pub fn new(db: D, clock: C) -> crate::error::Result<Self> {
        let settings = db.get_settings()?;
        let mut app = Self {
            running: false,
            view: View::Inventory,
            modal: ModalState::None,
            settings,
            reports: Vec::new(),
            summary: FleetSummary::default(),
            inventory_state: ListState::default(),
            detail: DetailState::default(),
            lookup_kind: LookupKind::Brand,
            lookups: Vec::new(),
            lookup_state: ListState::default(),
            pickers: Pickers::default(),
            battery_form: BatteryForm::default(),
            lookup_form: LookupForm::default(),
            resistance_input: String::new(),
            settings_state: SettingsState::default(),
            notification: None,
            db,
            clock,
        };
        app.refresh_data();
        Ok(app)
    }

    pub fn language(&self) -> Language {
        self.settings.language
    }

    /// Run the application's main loop
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            if let Some(event) = poll_event(TICK_RATE)? {
                match event {
                    AppEvent::Key(key) => self.handle_key_event(key),
                    AppEvent::Tick => self.handle_tick(),
                }
            }
        }

        Ok(())
    }

    /// Render the current view
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        match self.view {
            View::Inventory => render_inventory(frame, area, self),
            View::Detail => render_detail(frame, area, self),
            View::Lookups => render_lookups(frame, area, self),
            View::Stats => render_stats(frame, area, self),
        }

        // Render modal on top if visible
        match self.modal {
            ModalState::None => {}
            ModalState::NewBattery => render_battery_modal(frame, area, self),
            ModalState::NewLookup => render_lookup_modal(frame, area, self),
            ModalState::Resistance => render_resistance_modal(frame, area, self),
            ModalState::Settings => render_settings_modal(frame, area, self),
        }
    }

    /// Handle a key event
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // Handle modal input first
        match self.modal {
            ModalState::NewBattery => {
                self.handle_battery_modal_key(key);
                return;
            }
            ModalState::NewLookup => {
                self.handle_lookup_modal_key(key);
                return;
            }
            ModalState::Resistance => {
                self.handle_resistance_modal_key(key);
                return;
            }
            ModalState::Settings => {
                self.handle_settings_modal_key(key);
                return;
            }
            ModalState::None => {}
        }

        // Global keys
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => self.quit(),
            (_, KeyCode::Char('q')) => self.quit(),
            (_, KeyCode::Esc) if self.view == View::Detail => self.view = View::Inventory,
            (_, KeyCode::Esc) => self.quit(),
            (_, KeyCode::Char('1')) => self.view = View::Inventory,
            (_, KeyCode::Char('2')) => self.view = View::Lookups,
            (_, KeyCode::Char('3')) => self.view = View::Stats,
            (_, KeyCode::Char('o')) => self.open_settings(),
            _ => {
                // View-specific keys
                match self.view {
                    View::Inventory => self.handle_inventory_key(key),
                    View::Detail => self.handle_detail_key(key),
                    View::Lookups => self.handle_lookups_key(key),
                    View::Stats => {}
                }
            }
        }
    }

    /// Handle inventory view keys
    fn handle_inventory_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                select_next(&mut self.inventory_state, self.reports.len())
            }
            KeyCode::Char('k') | KeyCode::Up => {
                select_prev(&mut self.inventory_state, self.reports.len())
            }
            KeyCode::Enter => self.open_detail(),
            KeyCode::Char('n') => self.open_battery_form(),
            KeyCode::Char('e') => self.open_battery_edit(),
            KeyCode::Char('t') => self.toggle_selected_battery(),
            KeyCode::Char('x') => self.delete_selected_battery(),
            _ => self.handle_battery_action_key(key),
        }
    }

    /// Handle detail view keys
    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Backspace => self.view = View::Inventory,
            KeyCode::Tab => {
                self.detail.pane = match self.detail.pane {
                    DetailPane::History => DetailPane::Resistance,
                    DetailPane::Resistance => DetailPane::History,
                };
            }
            KeyCode::Char('j') | KeyCode::Down => match self.detail.pane {
                DetailPane::History => {
                    select_next(&mut self.detail.records_state, self.detail.records.len())
                }
                DetailPane::Resistance => select_next(
                    &mut self.detail.resistance_state,
                    self.detail.resistance.len(),
                ),
            },
            KeyCode::Char('k') | KeyCode::Up => match self.detail.pane {
                DetailPane::History => {
                    select_prev(&mut self.detail.records_state, self.detail.records.len())
                }
                DetailPane::Resistance => select_prev(
                    &mut self.detail.resistance_state,
                    self.detail.resistance.len(),
                ),
            },
            KeyCode::Char('x') => self.delete_selected_record(),
            _ => self.handle_battery_action_key(key),
        }
    }

    /// Keys that act on the selected battery in both inventory and detail
    fn handle_battery_action_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') => self.record_status(BatteryStatus::Charged),
            KeyCode::Char('s') => self.record_status(BatteryStatus::Stored),
            KeyCode::Char('d') => self.record_status(BatteryStatus::Discharged),
            KeyCode::Char('r') => {
                if self.selected_battery().is_some() {
                    self.resistance_input.clear();
                    self.modal = ModalState::Resistance;
                }
            }
            _ => {}
        }
    }

    /// Handle lookups view keys
    fn handle_lookups_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.lookup_kind = self.lookup_kind.prev();
                self.lookup_state.select(None);
                self.refresh_data();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.lookup_kind = self.lookup_kind.next();
                self.lookup_state.select(None);
                self.refresh_data();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                select_next(&mut self.lookup_state, self.lookups.len())
            }
            KeyCode::Char('k') | KeyCode::Up => {
                select_prev(&mut self.lookup_state, self.lookups.len())
            }
            KeyCode::Char('n') => {
                self.lookup_form = LookupForm::default();
                self.modal = ModalState::NewLookup;
            }
            KeyCode::Char('r') => self.open_lookup_rename(),
            KeyCode::Char('e') => self.toggle_selected_lookup(),
            KeyCode::Char('x') => self.delete_selected_lookup(),
            _ => {}
        }
    }

    /// Handle new battery modal keys
    fn handle_battery_modal_key(&mut self, key: KeyEvent) {
        let form = &mut self.battery_form;
        match key.code {
            KeyCode::Esc => self.modal = ModalState::None,
            KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
            KeyCode::BackTab | KeyCode::Up => form.field = form.field.prev(),
            KeyCode::Enter => self.save_battery(),
            KeyCode::Left | KeyCode::Right => {
                if let Some(kind) = form.field.picker_kind() {
                    let len = self.pickers.get(kind).len();
                    let idx = match kind {
                        LookupKind::Brand => &mut form.brand_idx,
                        LookupKind::Series => &mut form.series_idx,
                        LookupKind::Type => &mut form.type_idx,
                    };
                    if len > 0 {
                        *idx = if key.code == KeyCode::Right {
                            (*idx + 1) % len
                        } else if *idx == 0 {
                            len - 1
                        } else {
                            *idx - 1
                        };
                    }
                }
            }
            KeyCode::Backspace => match form.field {
                BatteryField::Label => {
                    form.label.pop();
                }
                BatteryField::Cells => {
                    form.cells.pop();
                }
                BatteryField::Capacity => {
                    form.capacity.pop();
                }
                _ => {}
            },
            KeyCode::Char(c) => match form.field {
                BatteryField::Label => form.label.push(c),
                BatteryField::Cells if c.is_ascii_digit() => form.cells.push(c),
                BatteryField::Capacity if c.is_ascii_digit() => form.capacity.push(c),
                _ => {}
            },
            _ => {}
        }
    }

    /// Handle new lookup modal keys
    fn handle_lookup_modal_key(&mut self, key: KeyEvent) {
        let form = &mut self.lookup_form;
        match key.code {
            KeyCode::Esc => self.modal = ModalState::None,
            KeyCode::Tab => {
                if self.lookup_kind.has_color() {
                    form.field = match form.field {
                        LookupField::Label => LookupField::Color,
                        LookupField::Color => LookupField::Label,
                    };
                }
            }
            KeyCode::Enter => self.save_lookup(),
            KeyCode::Backspace => match form.field {
                LookupField::Label => {
                    form.label.pop();
                }
                LookupField::Color => {
                    form.color.pop();
                }
            },
            KeyCode::Char(c) => match form.field {
                LookupField::Label => form.label.push(c),
                LookupField::Color => form.color.push(c),
            },
            _ => {}
        }
    }

    /// Handle resistance entry modal keys
    fn handle_resistance_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.modal = ModalState::None,
            KeyCode::Enter => self.save_resistance(),
            KeyCode::Backspace => {
                self.resistance_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | ',' | ' ') => {
                self.resistance_input.push(c);
            }
            _ => {}
        }
    }

    /// Handle settings modal keys
    fn handle_settings_modal_key(&mut self, key: KeyEvent) {
        let state = &mut self.settings_state;
        match key.code {
            KeyCode::Esc => self.modal = ModalState::None,
            KeyCode::Tab | KeyCode::Down => {
                self.apply_editing_value();
                self.settings_state.field = self.settings_state.field.next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.apply_editing_value();
                self.settings_state.field = self.settings_state.field.prev();
            }
            KeyCode::Enter => self.save_settings(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => match state.field {
                SettingsField::Language => state.editing.language = state.editing.language.next(),
                SettingsField::Theme => state.editing.theme = state.editing.theme.next(),
                SettingsField::AlertDays => {}
            },
            KeyCode::Backspace => {
                state.editing_value.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() && state.field == SettingsField::AlertDays => {
                state.editing_value.push(c);
            }
            _ => {}
        }
    }

    fn open_settings(&mut self) {
        self.settings_state = SettingsState {
            field: SettingsField::AlertDays,
            editing_value: self.settings.battery_alert_days.to_string(),
            editing: self.settings.clone(),
        };
        self.modal = ModalState::Settings;
    }

    /// Apply the alert days buffer to the editing settings
    fn apply_editing_value(&mut self) {
        if let Ok(days) = self.settings_state.editing_value.parse::<i64>()
            && validate_alert_days(days).is_ok()
        {
            self.settings_state.editing.battery_alert_days = days;
        }
    }

    /// Save all settings to the database
    fn save_settings(&mut self) {
        if self.settings_state.field == SettingsField::AlertDays {
            let days = self.settings_state.editing_value.parse::<i64>().unwrap_or(0);
            if let Err(msg) = validate_alert_days(days) {
                self.notify(NotificationLevel::Warning, msg);
                return;
            }
        }
        self.apply_editing_value();

        let settings = self.settings_state.editing.clone();
        match self.db.save_settings(&settings) {
            Ok(()) => {
                self.settings = settings;
                self.modal = ModalState::None;
                self.refresh_data();
            }
            Err(e) => self.notify_error("Failed to save settings", e),
        }
    }

    /// The battery the action keys apply to
    pub fn selected_battery(&self) -> Option<&BatteryReport> {
        match self.view {
            View::Detail => self.detail.report.as_ref(),
            _ => self
                .inventory_state
                .selected()
                .and_then(|i| self.reports.get(i)),
        }
    }

    fn selected_battery_id(&self) -> Option<BatteryId> {
        self.selected_battery().map(|r| r.battery.id)
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_timestamp())
    }

    fn open_detail(&mut self) {
        if let Some(report) = self.selected_battery().cloned() {
            self.detail = DetailState {
                report: Some(report),
                ..DetailState::default()
            };
            self.view = View::Detail;
            self.refresh_detail();
        }
    }

    fn open_battery_form(&mut self) {
        if self.pickers.brands.is_empty()
            || self.pickers.series.is_empty()
            || self.pickers.types.is_empty()
        {
            self.notify(
                NotificationLevel::Warning,
                "Add an enabled brand, series and type first",
            );
            return;
        }
        self.battery_form = BatteryForm::default();
        self.modal = ModalState::NewBattery;
    }

    /// Open the battery modal prefilled with the selected battery
    fn open_battery_edit(&mut self) {
        let Some(battery) = self.selected_battery().map(|r| r.battery.clone()) else {
            return;
        };
        let position = |kind: LookupKind, id: LookupId| {
            self.pickers.get(kind).iter().position(|l| l.id == id)
        };
        let (Some(brand_idx), Some(series_idx), Some(type_idx)) = (
            position(LookupKind::Brand, battery.brand_id),
            position(LookupKind::Series, battery.series_id),
            position(LookupKind::Type, battery.type_id),
        ) else {
            self.notify(
                NotificationLevel::Warning,
                "Its brand, series or type is disabled or deleted",
            );
            return;
        };
        self.battery_form = BatteryForm {
            editing: Some(battery.id),
            field: BatteryField::Label,
            label: battery.label,
            brand_idx,
            series_idx,
            type_idx,
            cells: battery.cells.to_string(),
            capacity: battery.capacity_mah.to_string(),
        };
        self.modal = ModalState::NewBattery;
    }

    /// Append a usage record for the selected battery
    pub fn record_status(&mut self, status: BatteryStatus) {
        let Some(id) = self.selected_battery_id() else {
            return;
        };
        let now = self.now();
        match self.db.add_usage_record(id, status, now) {
            Ok(_) => {
                let label = crate::i18n::status_label(self.language(), status);
                self.notify(NotificationLevel::Info, format!("Marked as {}", label));
                self.refresh_data();
            }
            Err(e) => self.notify_error("Failed to record status", e),
        }
    }

    fn save_battery(&mut self) {
        let form = &self.battery_form;
        if let Err(msg) = validate_label(&form.label) {
            self.notify(NotificationLevel::Warning, msg);
            return;
        }
        let cells = match parse_cells(&form.cells) {
            Ok(cells) => cells,
            Err(msg) => {
                self.notify(NotificationLevel::Warning, msg);
                return;
            }
        };
        let capacity_mah = match parse_capacity(&form.capacity) {
            Ok(capacity) => capacity,
            Err(msg) => {
                self.notify(NotificationLevel::Warning, msg);
                return;
            }
        };
        let (Some(brand), Some(series), Some(battery_type)) = (
            self.pickers.brands.get(form.brand_idx),
            self.pickers.series.get(form.series_idx),
            self.pickers.types.get(form.type_idx),
        ) else {
            self.notify(NotificationLevel::Warning, "Pick a brand, series and type");
            return;
        };

        let battery = NewBattery {
            label: form.label.trim().to_string(),
            brand_id: brand.id,
            series_id: series.id,
            type_id: battery_type.id,
            cells,
            capacity_mah,
            created_at: self.now(),
        };

        let result = match form.editing {
            Some(id) => self.db.get_battery(id).and_then(|existing| {
                self.db.update_battery(&Battery {
                    label: battery.label.clone(),
                    brand_id: battery.brand_id,
                    series_id: battery.series_id,
                    type_id: battery.type_id,
                    cells: battery.cells,
                    capacity_mah: battery.capacity_mah,
                    ..existing
                })
            }),
            None => self.db.create_battery(&battery).map(|_| ()),
        };

        let verb = if form.editing.is_some() { "Updated" } else { "Added" };
        match result {
            Ok(()) => {
                self.modal = ModalState::None;
                self.notify(
                    NotificationLevel::Info,
                    format!("{} battery {}", verb, battery.label),
                );
                self.refresh_data();
            }
            Err(e) => self.notify_error("Failed to save battery", e),
        }
    }

    fn toggle_selected_battery(&mut self) {
        let Some((id, enabled)) = self
            .selected_battery()
            .map(|r| (r.battery.id, !r.battery.enabled))
        else {
            return;
        };
        if let Err(e) = self.db.set_battery_enabled(id, enabled) {
            self.notify_error("Failed to update battery", e);
        }
        self.refresh_data();
    }

    fn delete_selected_battery(&mut self) {
        let Some(id) = self.selected_battery_id() else {
            return;
        };
        match self.db.delete_battery(id) {
            Ok(()) => {
                self.notify(NotificationLevel::Info, "Battery deleted");
                self.refresh_data();
            }
            Err(e) => self.notify_error("Failed to delete battery", e),
        }
    }

    fn delete_selected_record(&mut self) {
        let result = match self.detail.pane {
            DetailPane::History => {
                let Some(record) = self
                    .detail
                    .records_state
                    .selected()
                    .and_then(|i| self.detail.records.get(i))
                else {
                    return;
                };
                self.db.delete_usage_record(record.id)
            }
            DetailPane::Resistance => {
                let Some(record) = self
                    .detail
                    .resistance_state
                    .selected()
                    .and_then(|i| self.detail.resistance.get(i))
                else {
                    return;
                };
                self.db.delete_resistance_record(record.id)
            }
        };
        match result {
            Ok(()) => {
                self.notify(NotificationLevel::Info, "Record deleted");
                self.refresh_data();
            }
            Err(e) => self.notify_error("Failed to delete record", e),
        }
    }

    fn save_resistance(&mut self) {
        let Some((id, cell_count)) = self
            .selected_battery()
            .map(|r| (r.battery.id, r.battery.cells))
        else {
            self.modal = ModalState::None;
            return;
        };
        let cells = match parse_resistance(&self.resistance_input, cell_count) {
            Ok(cells) => cells,
            Err(msg) => {
                self.notify(NotificationLevel::Warning, msg);
                return;
            }
        };
        let now = self.now();
        match self.db.add_resistance_record(id, now, &cells) {
            Ok(_) => {
                self.modal = ModalState::None;
                self.notify(NotificationLevel::Info, "Resistance recorded");
                self.refresh_data();
            }
            Err(e) => self.notify_error("Failed to record resistance", e),
        }
    }

    /// Open the lookup modal prefilled with the selected entry
    fn open_lookup_rename(&mut self) {
        let Some(lookup) = self.selected_lookup() else {
            return;
        };
        self.lookup_form = LookupForm {
            editing: Some(lookup.id),
            field: LookupField::Label,
            label: lookup.label.clone(),
            color: lookup.color.clone().unwrap_or_default(),
        };
        self.modal = ModalState::NewLookup;
    }

    fn save_lookup(&mut self) {
        let kind = self.lookup_kind;
        let editing = self.lookup_form.editing;
        let label = self.lookup_form.label.trim().to_string();
        let valid = match editing.and_then(|id| self.lookups.iter().find(|l| l.id == id)) {
            Some(current) => validate_update_lookup_label(&label, &self.lookups, &current.label),
            None => validate_new_lookup_label(&label, &self.lookups),
        };
        if let Err(msg) = valid {
            self.notify(NotificationLevel::Warning, msg);
            return;
        }
        let color = self.lookup_form.color.trim().to_string();
        let color = if kind.has_color() && !color.is_empty() {
            if let Err(msg) = validate_color(&color) {
                self.notify(NotificationLevel::Warning, msg);
                return;
            }
            Some(color)
        } else {
            None
        };

        let result = match editing {
            Some(id) => self.db.update_lookup(kind, id, &label, color.as_deref()),
            None => self
                .db
                .create_lookup(kind, &label, color.as_deref())
                .map(|_| ()),
        };
        match result {
            Ok(()) => {
                self.modal = ModalState::None;
                self.notify(NotificationLevel::Info, format!("Saved {}", label));
                self.refresh_data();
            }
            Err(e) => self.notify_error("Failed to save entry", e),
        }
    }

    fn selected_lookup(&self) -> Option<&Lookup> {
        self.lookup_state
            .selected()
            .and_then(|i| self.lookups.get(i))
    }

    fn toggle_selected_lookup(&mut self) {
        let Some(lookup) = self.selected_lookup() else {
            return;
        };
        let (id, enabled) = (lookup.id, !lookup.enabled);
        if let Err(e) = self.db.set_lookup_enabled(self.lookup_kind, id, enabled) {
            self.notify_error("Failed to update entry", e);
        }
        self.refresh_data();
    }

    fn delete_selected_lookup(&mut self) {
        let Some(lookup) = self.selected_lookup() else {
            return;
        };
        let (id, label) = (lookup.id, lookup.label.clone());
        let kind = self.lookup_kind;
        let in_use = match self.db.count_batteries_using(kind, id) {
            Ok(count) => count,
            Err(e) => {
                self.notify_error("Failed to delete entry", e);
                return;
            }
        };
        match self.db.delete_lookup(kind, id) {
            Ok(()) if in_use > 0 => self.notify(
                NotificationLevel::Warning,
                format!("Deleted {} (still used by {} batteries)", label, in_use),
            ),
            Ok(()) => self.notify(NotificationLevel::Info, format!("Deleted {}", label)),
            Err(e) => self.notify_error("Failed to delete entry", e),
        }
        self.refresh_data();
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notification = Some(Notification {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    fn notify_error(&mut self, context: &str, err: CellkeeperError) {
        error!("{}: {}", context, err);
        self.notify(NotificationLevel::Error, format!("{}: {}", context, err));
    }

    /// Handle a tick
    fn handle_tick(&mut self) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.shown_at.elapsed() >= NOTIFICATION_TTL)
        {
            self.notification = None;
        }
    }

    /// Refresh data from database
    pub fn refresh_data(&mut self) {
        match build_report(&self.db, &self.clock) {
            Ok(reports) => {
                self.summary = FleetSummary::from_reports(&reports);
                self.reports = reports;
                clamp_selection(&mut self.inventory_state, self.reports.len());
            }
            Err(e) => self.notify_error("Failed to load batteries", e),
        }

        match self.db.list_lookups(self.lookup_kind) {
            Ok(lookups) => {
                self.lookups = lookups;
                clamp_selection(&mut self.lookup_state, self.lookups.len());
            }
            Err(e) => self.notify_error("Failed to load entries", e),
        }

        for kind in LookupKind::ALL {
            match self.db.list_lookups(kind) {
                Ok(all) => {
                    let enabled = all.into_iter().filter(|l| l.enabled).collect();
                    match kind {
                        LookupKind::Brand => self.pickers.brands = enabled,
                        LookupKind::Series => self.pickers.series = enabled,
                        LookupKind::Type => self.pickers.types = enabled,
                    }
                }
                Err(e) => warn!("Failed to load {} picker: {}", kind.entity(), e),
            }
        }

        if self.view == View::Detail {
            self.refresh_detail();
        }
    }

    /// Reload the detail battery, leaving the view if it is gone
    fn refresh_detail(&mut self) {
        let Some(id) = self.detail.report.as_ref().map(|r| r.battery.id) else {
            return;
        };
        let Some(report) = self.reports.iter().find(|r| r.battery.id == id).cloned() else {
            self.detail = DetailState::default();
            self.view = View::Inventory;
            return;
        };
        self.detail.report = Some(report);

        match self.db.list_usage_records(id) {
            Ok(records) => {
                self.detail.records = records;
                clamp_selection(&mut self.detail.records_state, self.detail.records.len());
            }
            Err(e) => self.notify_error("Failed to load history", e),
        }
        match self.db.list_resistance_records(id) {
            Ok(records) => {
                self.detail.resistance = records;
                clamp_selection(
                    &mut self.detail.resistance_state,
                    self.detail.resistance.len(),
                );
            }
            Err(e) => self.notify_error("Failed to load resistance", e),
        }
    }

    /// Quit the application
    fn quit(&mut self) {
        self.running = false;
    }
}

fn select_next(state: &mut ListState, len: usize) {
    if len > 0 {
        let i = state.selected().map(|i| (i + 1) % len);
        state.select(i.or(Some(0)));
    }
}

fn select_prev(state: &mut ListState, len: usize) {
    if len > 0 {
        let i = state
            .selected()
            .map(|i| if i == 0 { len - 1 } else { i - 1 });
        state.select(i.or(Some(0)));
    }
}

/// Keep the selection inside the list after a reload
fn clamp_selection(state: &mut ListState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        None => state.select(Some(0)),
        Some(i) if i >= len => state.select(Some(len - 1)),
        Some(_) => {}
    }
}
