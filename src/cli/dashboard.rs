use std::path::Path;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Gauge, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::error::{PocketbookError, Result};
use crate::fmt::{money, percent};
use crate::models::Category;
use crate::reports::category_share;
use crate::session::Session;
use crate::settings::Settings;
use crate::tui::{
    centered_rect, chart_color, money_span, run_view, View, ViewAction, FOOTER_STYLE,
    HEADER_STYLE, NOTICE_STYLE, SELECTED_STYLE,
};

const TAB_TITLES: &[&str] = &["Expenses", "Invoices", "Chart", "Reserve"];

const INVALID_AMOUNT_NOTICE: &str = "Please enter a valid amount.";
const INVALID_GOAL_NOTICE: &str = "Please enter a valid reserve goal.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Expenses,
    Invoices,
    Chart,
    Reserve,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Expenses, Tab::Invoices, Tab::Chart, Tab::Reserve];

    fn index(self) -> usize {
        Tab::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }

    fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExpenseField {
    Category,
    Amount,
    Description,
}

impl ExpenseField {
    fn down(self) -> Self {
        match self {
            ExpenseField::Category => ExpenseField::Amount,
            ExpenseField::Amount | ExpenseField::Description => ExpenseField::Description,
        }
    }

    fn up(self) -> Self {
        match self {
            ExpenseField::Description => ExpenseField::Amount,
            ExpenseField::Amount | ExpenseField::Category => ExpenseField::Category,
        }
    }
}

pub struct Dashboard {
    session: Session,
    title: String,
    tab: Tab,
    field: ExpenseField,
    invoice_input: String,
    goal_input: String,
    /// Blocking message; swallows the next key press.
    notice: Option<String>,
    status_message: Option<String>,
}

impl Dashboard {
    pub fn new(settings: &Settings) -> Self {
        let session = Session::new(settings.starting_goal());
        let goal_input = format_goal(session.reserve_goal());
        Self {
            session,
            title: settings.dashboard_title(),
            tab: Tab::Expenses,
            field: ExpenseField::Category,
            invoice_input: String::new(),
            goal_input,
            notice: None,
            status_message: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    fn cycle_category(&mut self, forward: bool) {
        // Position 0 is "Select" (no category).
        let slots = Category::ALL.len() + 1;
        let current = self
            .session
            .draft()
            .category
            .and_then(|c| Category::ALL.iter().position(|&x| x == c))
            .map(|i| i + 1)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        let category = if next == 0 { None } else { Some(Category::ALL[next - 1]) };
        self.session.set_draft_category(category);
    }

    fn commit_expense(&mut self) {
        match self.session.submit_expense() {
            Ok(expense) => {
                let label = expense.category.map(Category::label).unwrap_or("Uncategorized");
                self.status_message = Some(format!("Added {label} - {}", money(expense.amount.value())));
                self.field = ExpenseField::Category;
            }
            Err(e) => self.show_error(e),
        }
    }

    fn commit_invoice(&mut self) {
        let selected = self.invoice_input.trim().to_string();
        let before = self.session.invoices().len();
        let file = (!selected.is_empty()).then(|| Path::new(selected.as_str()));
        self.session.record_invoice(file);
        if let Some(invoice) = self.session.invoices().get(before) {
            self.status_message = Some(format!("Recorded invoice {}", invoice.name));
        }
        self.invoice_input.clear();
    }

    fn commit_goal(&mut self) {
        match self.session.set_goal(&self.goal_input) {
            Ok(goal) => {
                self.goal_input = format_goal(goal);
                self.status_message = Some(format!("Reserve goal set to {}", money(goal)));
            }
            Err(e) => self.show_error(e),
        }
    }

    fn show_error(&mut self, e: PocketbookError) {
        let notice = match e {
            PocketbookError::InvalidAmount(_) => INVALID_AMOUNT_NOTICE.to_string(),
            PocketbookError::InvalidGoal(_) => INVALID_GOAL_NOTICE.to_string(),
            other => other.to_string(),
        };
        self.notice = Some(notice);
    }

    fn handle_expense_key(&mut self, code: KeyCode) {
        match (self.field, code) {
            (_, KeyCode::Up) => self.field = self.field.up(),
            (_, KeyCode::Down) => self.field = self.field.down(),
            (_, KeyCode::Enter) => self.commit_expense(),
            (ExpenseField::Category, KeyCode::Right | KeyCode::Char(' ')) => self.cycle_category(true),
            (ExpenseField::Category, KeyCode::Left) => self.cycle_category(false),
            (ExpenseField::Amount, KeyCode::Char(c)) => self.session.draft_mut().amount.push(c),
            (ExpenseField::Amount, KeyCode::Backspace) => {
                self.session.draft_mut().amount.pop();
            }
            (ExpenseField::Description, KeyCode::Char(c)) => {
                self.session.draft_mut().description.push(c)
            }
            (ExpenseField::Description, KeyCode::Backspace) => {
                self.session.draft_mut().description.pop();
            }
            _ => {}
        }
    }

    pub fn handle_key_event(&mut self, code: KeyCode) -> ViewAction {
        if self.notice.take().is_some() {
            return ViewAction::Continue;
        }
        match code {
            KeyCode::Esc => return ViewAction::Close,
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.status_message = None;
                return ViewAction::Continue;
            }
            KeyCode::BackTab => {
                self.tab = self.tab.prev();
                self.status_message = None;
                return ViewAction::Continue;
            }
            _ => {}
        }
        match self.tab {
            Tab::Expenses => self.handle_expense_key(code),
            Tab::Invoices => match code {
                KeyCode::Char(c) => self.invoice_input.push(c),
                KeyCode::Backspace => {
                    self.invoice_input.pop();
                }
                KeyCode::Enter => self.commit_invoice(),
                _ => {}
            },
            Tab::Chart => {}
            Tab::Reserve => match code {
                KeyCode::Char(c) => self.goal_input.push(c),
                KeyCode::Backspace => {
                    self.goal_input.pop();
                }
                KeyCode::Enter => self.commit_goal(),
                _ => {}
            },
        }
        ViewAction::Continue
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    pub fn draw_frame(&self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let [header_area, sep1, tabs_area, sep2, body_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" {}", self.title)).style(HEADER_STYLE),
            header_area,
        );

        let sep_line = "━".repeat(area.width as usize);
        let sep_widget = Paragraph::new(sep_line.as_str()).style(border_style);
        frame.render_widget(sep_widget.clone(), sep1);
        frame.render_widget(sep_widget, sep2);

        let tabs = Tabs::new(TAB_TITLES.iter().copied())
            .select(self.tab.index())
            .highlight_style(SELECTED_STYLE)
            .divider("│");
        frame.render_widget(tabs, tabs_area);

        match self.tab {
            Tab::Expenses => self.draw_expenses(frame, body_area),
            Tab::Invoices => self.draw_invoices(frame, body_area),
            Tab::Chart => self.draw_chart(frame, body_area),
            Tab::Reserve => self.draw_reserve(frame, body_area),
        }

        if let Some(msg) = &self.status_message {
            frame.render_widget(
                Paragraph::new(format!(" {msg}")).style(Style::default().fg(Color::Yellow)),
                hints_area,
            );
        } else {
            frame.render_widget(Paragraph::new(self.hints()).style(FOOTER_STYLE), hints_area);
        }

        if let Some(notice) = &self.notice {
            let popup = centered_rect(area, 44, 5);
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(notice.as_str()),
                    Line::from(""),
                    Line::from(Span::styled("Press any key", FOOTER_STYLE)),
                ])
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(" Notice "))
                .style(NOTICE_STYLE),
                popup,
            );
        }
    }

    fn hints(&self) -> &'static str {
        match self.tab {
            Tab::Expenses => {
                " Up/Down=field  Left/Right=category  Enter=add  Tab=next tab  Esc=quit"
            }
            Tab::Invoices => " Type a file path  Enter=record  Tab=next tab  Esc=quit",
            Tab::Chart => " Tab=next tab  Shift-Tab=previous  Esc=quit",
            Tab::Reserve => " Type a goal  Enter=set  Tab=next tab  Esc=quit",
        }
    }

    fn field_line(&self, field: ExpenseField, label: &str, value: &str) -> Line<'static> {
        let focused = self.field == field;
        let marker = if focused { ">" } else { " " };
        let value_style = if focused { SELECTED_STYLE } else { Style::default() };
        Line::from(vec![
            Span::raw(format!(" {marker} {label:<13}")),
            Span::styled(value.to_string(), value_style),
        ])
    }

    fn draw_expenses(&self, frame: &mut Frame, area: Rect) {
        let [form_area, list_area] =
            Layout::vertical([Constraint::Length(5), Constraint::Fill(1)]).areas(area);

        let draft = self.session.draft();
        let category = match draft.category {
            Some(c) => format!("< {} >", c.label()),
            None => "< Select >".to_string(),
        };
        let form = vec![
            Line::from(""),
            self.field_line(ExpenseField::Category, "Category", &category),
            self.field_line(ExpenseField::Amount, "Amount", &draft.amount),
            self.field_line(ExpenseField::Description, "Description", &draft.description),
        ];
        frame.render_widget(Paragraph::new(form), form_area);

        let mut lines = vec![Line::from(Span::styled(
            " Logged Expenses",
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if self.session.expenses().is_empty() {
            lines.push(Line::from(Span::styled(" Nothing logged yet.", FOOTER_STYLE)));
        }
        for expense in self.session.expenses() {
            let label = expense.category.map(Category::label).unwrap_or("Uncategorized");
            lines.push(Line::from(vec![
                Span::styled(format!(" {label}"), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" - "),
                money_span(expense.amount.value()),
            ]));
            if !expense.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("   {}", expense.description),
                    FOOTER_STYLE,
                )));
            }
        }
        frame.render_widget(Paragraph::new(lines), list_area);
    }

    fn draw_invoices(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw(" > File path    "),
                Span::styled(self.invoice_input.clone(), SELECTED_STYLE),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                " Invoices Sent",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        if self.session.invoices().is_empty() {
            lines.push(Line::from(Span::styled(" No invoices yet.", FOOTER_STYLE)));
        }
        for invoice in self.session.invoices() {
            lines.push(Line::from(format!(" {}", invoice.name)));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Spending by Category")
            .title_style(Style::default().add_modifier(Modifier::BOLD))
            .borders(Borders::NONE);

        let totals = self.session.category_totals();
        if totals.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" No expenses to chart yet.", FOOTER_STYLE))
                    .block(block),
                area,
            );
            return;
        }

        let bars: Vec<Bar> = category_share(&totals)
            .into_iter()
            .enumerate()
            .map(|(i, (category, share))| {
                Bar::default()
                    .value((share * 10.0).round() as u64)
                    .text_value(percent(share))
                    .label(Line::from(category.label()))
                    .style(Style::default().fg(chart_color(i)))
                    .value_style(Style::default().fg(Color::Black).bg(chart_color(i)))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(11)
            .bar_gap(2);
        frame.render_widget(chart, area);
    }

    fn draw_reserve(&self, frame: &mut Frame, area: Rect) {
        let [input_area, gauge_area, text_area, _] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(vec![
                    Span::raw(" > Reserve goal ($)  "),
                    Span::styled(self.goal_input.clone(), SELECTED_STYLE),
                ]),
            ]),
            input_area,
        );

        let progress = self.session.progress();
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
            .ratio(progress.progress_pct / 100.0)
            .label(percent(progress.progress_pct));
        frame.render_widget(gauge, gauge_area);

        frame.render_widget(
            Paragraph::new(progress_text(&self.session)).style(FOOTER_STYLE),
            text_area,
        );
    }
}

impl View for Dashboard {
    fn draw(&mut self, frame: &mut Frame) {
        self.draw_frame(frame);
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        self.handle_key_event(code)
    }
}

fn format_goal(goal: f64) -> String {
    if goal.fract() == 0.0 && goal.abs() < 1e15 {
        format!("{goal:.0}")
    } else {
        goal.to_string()
    }
}

/// `Progress: $<spent> of $<goal> (<pct>%)`
pub fn progress_text(session: &Session) -> String {
    let progress = session.progress();
    format!(
        " Progress: {} of {} ({})",
        money(progress.total_spent),
        money(session.reserve_goal()),
        percent(progress.progress_pct)
    )
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

pub fn run(settings: &Settings) -> Result<()> {
    let mut dashboard = Dashboard::new(settings);
    run_view(&mut dashboard)?;
    tracing::info!(
        expenses = dashboard.session().expenses().len(),
        invoices = dashboard.session().invoices().len(),
        "session closed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn dashboard() -> Dashboard {
        Dashboard::new(&Settings::default())
    }

    fn type_text(dashboard: &mut Dashboard, text: &str) {
        for c in text.chars() {
            dashboard.handle_key_event(KeyCode::Char(c));
        }
    }

    fn render(dashboard: &Dashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| dashboard.draw_frame(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn add_expense(dashboard: &mut Dashboard, steps_right: usize, amount: &str, description: &str) {
        for _ in 0..steps_right {
            dashboard.handle_key_event(KeyCode::Right);
        }
        dashboard.handle_key_event(KeyCode::Down);
        type_text(dashboard, amount);
        dashboard.handle_key_event(KeyCode::Down);
        type_text(dashboard, description);
        dashboard.handle_key_event(KeyCode::Enter);
    }

    #[test]
    fn test_tab_cycles_forward_and_back() {
        let mut d = dashboard();
        assert_eq!(d.tab, Tab::Expenses);
        d.handle_key_event(KeyCode::Tab);
        assert_eq!(d.tab, Tab::Invoices);
        d.handle_key_event(KeyCode::BackTab);
        d.handle_key_event(KeyCode::BackTab);
        assert_eq!(d.tab, Tab::Reserve);
    }

    #[test]
    fn test_esc_closes() {
        let mut d = dashboard();
        assert!(matches!(d.handle_key_event(KeyCode::Esc), ViewAction::Close));
    }

    #[test]
    fn test_category_cycles_through_select() {
        let mut d = dashboard();
        d.handle_key_event(KeyCode::Right);
        assert_eq!(d.session().draft().category, Some(Category::Food));
        d.handle_key_event(KeyCode::Left);
        assert_eq!(d.session().draft().category, None);
        d.handle_key_event(KeyCode::Left);
        assert_eq!(d.session().draft().category, Some(Category::Other));
    }

    #[test]
    fn test_form_adds_expense() {
        let mut d = dashboard();
        add_expense(&mut d, 1, "50", "lunch");

        let expenses = d.session().expenses();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, Some(Category::Food));
        assert_eq!(expenses[0].description, "lunch");
        assert_eq!(d.session().draft().amount, "");
        assert_eq!(d.field, ExpenseField::Category);
        assert!(d.status_message.as_deref().unwrap().contains("Food"));
    }

    #[test]
    fn test_invalid_amount_blocks_with_notice() {
        let mut d = dashboard();
        add_expense(&mut d, 1, "", "x");

        assert!(d.session().expenses().is_empty());
        assert_eq!(d.notice.as_deref(), Some(INVALID_AMOUNT_NOTICE));
        assert_eq!(d.session().draft().description, "x");

        // First key only dismisses the notice.
        assert!(matches!(d.handle_key_event(KeyCode::Esc), ViewAction::Continue));
        assert!(d.notice.is_none());
        assert!(render(&d).contains("Logged Expenses"));
    }

    #[test]
    fn test_backspace_edits_amount() {
        let mut d = dashboard();
        d.handle_key_event(KeyCode::Down);
        type_text(&mut d, "123");
        d.handle_key_event(KeyCode::Backspace);
        assert_eq!(d.session().draft().amount, "12");
    }

    #[test]
    fn test_invoice_tab_records_names_in_order() {
        let mut d = dashboard();
        d.handle_key_event(KeyCode::Tab);
        type_text(&mut d, "/tmp/march.pdf");
        d.handle_key_event(KeyCode::Enter);
        type_text(&mut d, "april.pdf");
        d.handle_key_event(KeyCode::Enter);
        d.handle_key_event(KeyCode::Enter); // empty selection is ignored

        let names: Vec<&str> = d.session().invoices().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["march.pdf", "april.pdf"]);
        assert!(d.invoice_input.is_empty());

        let screen = render(&d);
        assert!(screen.contains("march.pdf"));
        assert!(screen.contains("april.pdf"));
    }

    #[test]
    fn test_reserve_tab_sets_goal() {
        let mut d = dashboard();
        add_expense(&mut d, 1, "250", "groceries");
        d.handle_key_event(KeyCode::BackTab);
        assert_eq!(d.goal_input, "5000");

        for _ in 0..4 {
            d.handle_key_event(KeyCode::Backspace);
        }
        type_text(&mut d, "1000");
        d.handle_key_event(KeyCode::Enter);
        assert_eq!(d.session().reserve_goal(), 1000.0);
        assert_eq!(progress_text(d.session()), " Progress: $250.00 of $1,000.00 (25.0%)");
        assert!(render(&d).contains("Progress: $250.00 of $1,000.00 (25.0%)"));
    }

    #[test]
    fn test_reserve_tab_rejects_bad_goal() {
        let mut d = dashboard();
        d.handle_key_event(KeyCode::BackTab);
        type_text(&mut d, "abc");
        d.handle_key_event(KeyCode::Enter);
        assert_eq!(d.session().reserve_goal(), 5000.0);
        assert_eq!(d.notice.as_deref(), Some(INVALID_GOAL_NOTICE));
        assert!(render(&d).contains("Notice"));
    }

    #[test]
    fn test_chart_renders_categories() {
        let mut d = dashboard();
        add_expense(&mut d, 1, "50", "lunch");
        add_expense(&mut d, 1, "30", "snack");
        add_expense(&mut d, 2, "20", "bus");
        d.handle_key_event(KeyCode::Tab);
        d.handle_key_event(KeyCode::Tab);
        assert_eq!(d.tab, Tab::Chart);

        let screen = render(&d);
        assert!(screen.contains("Food"));
        assert!(screen.contains("Transport"));
        assert!(!screen.contains("Housing"));
    }

    #[test]
    fn test_chart_renders_huge_amounts() {
        let mut d = dashboard();
        add_expense(&mut d, 1, "1e17", "yacht");
        add_expense(&mut d, 3, "1e308", "castle");
        add_expense(&mut d, 3, "1e308", "another castle");
        d.handle_key_event(KeyCode::Tab);
        d.handle_key_event(KeyCode::Tab);

        let screen = render(&d);
        assert!(screen.contains("Food"));
        assert!(screen.contains("Housing"));
        assert!(screen.contains("100.0%"));
        assert!(!screen.contains("NaN"));
    }

    #[test]
    fn test_empty_chart_message() {
        let mut d = dashboard();
        d.handle_key_event(KeyCode::Tab);
        d.handle_key_event(KeyCode::Tab);
        assert!(render(&d).contains("No expenses to chart yet."));
    }

    #[test]
    fn test_title_uses_user_name() {
        let settings = Settings {
            user_name: "Leo".to_string(),
            reserve_goal: 800.0,
        };
        let d = Dashboard::new(&settings);
        assert_eq!(d.session().reserve_goal(), 800.0);
        assert!(render(&d).contains("Leo's Finance Dashboard"));
    }

    #[test]
    fn test_format_goal() {
        assert_eq!(format_goal(5000.0), "5000");
        assert_eq!(format_goal(12.5), "12.5");
        assert_eq!(format_goal(-3.0), "-3");
    }
}
