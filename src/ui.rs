use std::error::Error;
use std::io;
use std::time::Duration as StdDuration;

use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::card::{CardView, MediaRegion, TemplateRouter, compose};
use crate::domain::EventCatalog;

const FOCUSED_BORDER_COLOR: Color = Color::Yellow;
const HIGHLIGHT_BACKGROUND_COLOR: Color = Color::Rgb(42, 45, 52);
const PLACEHOLDER_PATTERN: &str = "·  ·  ·  ·  ·  ·  ·  ·  ·  ·";
const PLACEHOLDER_EMBLEM: &str = "🎉";

// The four card glyphs, referenced by logical name so the set can be swapped
// without touching render logic.
fn glyph(name: &str) -> &'static str {
	match name {
		"pin" => "📍",
		"clock" => "🕒",
		"ticket" => "🎟",
		"people" => "👥",
		_ => "·",
	}
}

#[derive(Default)]
struct App {
	selected: usize,
	show_detail: bool,
	status: String,
}

impl App {
	fn clamp_selection(&mut self, card_count: usize) {
		if card_count == 0 {
			self.selected = 0;
			self.show_detail = false;
		} else if self.selected >= card_count {
			self.selected = card_count - 1;
		}
	}

	fn move_selection(&mut self, delta: isize, card_count: usize) {
		if card_count == 0 {
			return;
		}
		let last = card_count as isize - 1;
		let next = (self.selected as isize + delta).clamp(0, last);
		self.selected = next as usize;
	}
}

pub fn run_browser(catalog: &EventCatalog) -> Result<(), Box<dyn Error>> {
	enable_raw_mode()?;
	let mut stdout = io::stdout();
	stdout.execute(EnterAlternateScreen)?;
	let backend = CrosstermBackend::new(stdout);
	let mut terminal = Terminal::new(backend)?;

	let result = run_event_loop(&mut terminal, catalog);

	disable_raw_mode()?;
	execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
	terminal.show_cursor()?;

	result
}

fn run_event_loop(
	terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
	catalog: &EventCatalog,
) -> Result<(), Box<dyn Error>> {
	let mut app = App::default();
	let router = TemplateRouter::default();

	loop {
		// Cards are recomputed every pass: the browser owns re-invocation
		// timing, composition itself stays a pure per-record transform.
		let cards = catalog
			.events
			.iter()
			.map(|event| compose(event, &router))
			.collect::<Vec<_>>();
		app.clamp_selection(cards.len());
		terminal.draw(|frame| draw_browser(frame, &app, catalog, &cards))?;

		if event::poll(StdDuration::from_millis(250))? {
			if let CEvent::Key(key) = event::read()? {
				if key.kind != KeyEventKind::Press {
					continue;
				}

				match key.code {
					KeyCode::Char('q') => break,
					KeyCode::Esc => {
						if app.show_detail {
							app.show_detail = false;
						} else {
							break;
						}
					}
					KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1, cards.len()),
					KeyCode::Down | KeyCode::Char('j') => app.move_selection(1, cards.len()),
					KeyCode::Enter => {
						if let Some(card) = cards.get(app.selected) {
							app.show_detail = true;
							app.status = format!("view: {}", card.detail_link.href);
						} else {
							app.status = "no events in this catalog".to_string();
						}
					}
					_ => {}
				}
			}
		}
	}

	Ok(())
}

fn draw_browser(frame: &mut Frame, app: &App, catalog: &EventCatalog, cards: &[CardView]) {
	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Min(12), Constraint::Length(3)])
		.split(frame.area());

	let body = Layout::default()
		.direction(Direction::Horizontal)
		.constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
		.split(layout[0]);

	render_list_panel(frame, body[0], app, catalog, cards);
	render_card_panel(frame, body[1], cards.get(app.selected));
	render_footer(frame, layout[1], app);

	if app.show_detail {
		if let Some(card) = cards.get(app.selected) {
			render_detail_popup(frame, card);
		}
	}
}

fn render_list_panel(frame: &mut Frame, area: Rect, app: &App, catalog: &EventCatalog, cards: &[CardView]) {
	let items = catalog
		.events
		.iter()
		.zip(cards.iter())
		.map(|(event, card)| {
			ListItem::new(Line::from(vec![
				Span::styled(
					format!("{:>3} {:>2}", card.date_month(), card.date_day()),
					Style::default().fg(Color::Yellow),
				),
				Span::raw("  "),
				// One row per event; multi-line titles collapse to their
				// first line here and keep the full text in the card pane.
				Span::raw(event.short_title()),
			]))
		})
		.collect::<Vec<_>>();

	let mut state = ListState::default();
	if !cards.is_empty() {
		state.select(Some(app.selected.min(cards.len() - 1)));
	}

	let block = Block::default()
		.borders(Borders::ALL)
		.title(format!("{} ({})", catalog.header.name, cards.len()))
		.border_style(Style::default().fg(FOCUSED_BORDER_COLOR));
	let list = List::new(if items.is_empty() {
		vec![ListItem::new("(no events)")]
	} else {
		items
	})
	.block(block)
	.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR).add_modifier(Modifier::BOLD));

	frame.render_stateful_widget(list, area, &mut state);
}

fn render_card_panel(frame: &mut Frame, area: Rect, card: Option<&CardView>) {
	let lines = match card {
		Some(card) => card_lines(card),
		None => vec![Line::from("(no event selected)")],
	};

	let panel = Paragraph::new(lines)
		.wrap(Wrap { trim: false })
		.block(Block::default().borders(Borders::ALL).title("Card"));
	frame.render_widget(panel, area);
}

fn card_lines(card: &CardView) -> Vec<Line<'static>> {
	let mut lines = Vec::new();

	match &card.media {
		MediaRegion::Photo { uri, alt } => {
			lines.push(Line::from(vec![
				Span::styled("[img] ", Style::default().fg(Color::DarkGray)),
				Span::styled(uri.clone(), Style::default().fg(Color::Blue)),
			]));
			lines.push(Line::from(Span::styled(
				format!("      {alt}"),
				Style::default().fg(Color::DarkGray),
			)));
		}
		MediaRegion::Placeholder => {
			lines.push(Line::from(Span::styled(
				PLACEHOLDER_PATTERN,
				Style::default().fg(Color::Blue),
			)));
			lines.push(Line::from(format!("              {PLACEHOLDER_EMBLEM}")));
			lines.push(Line::from(Span::styled(
				PLACEHOLDER_PATTERN,
				Style::default().fg(Color::Blue),
			)));
		}
	}

	lines.push(Line::from(Span::styled(
		format!("[{}]", card.category),
		Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
	)));
	lines.push(Line::from(""));

	lines.push(Line::from(vec![
		Span::styled(
			format!("{} {}", card.date_month(), card.date_day()),
			Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
		),
		Span::raw("   "),
		Span::raw(format!("{} ", glyph("pin"))),
		Span::styled(card.location.clone(), Style::default().fg(Color::Gray)),
	]));
	lines.push(Line::from(Span::styled(
		card.title.clone(),
		Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
	)));
	if !card.description.is_empty() {
		lines.push(Line::from(Span::styled(
			card.description.clone(),
			Style::default().fg(Color::Gray),
		)));
	}
	lines.push(Line::from(""));

	lines.push(Line::from(vec![
		Span::raw(format!("{} ", glyph("clock"))),
		Span::raw(format!("By {}", card.organizer)),
		Span::raw("   "),
		Span::raw(format!("{} ", glyph("people"))),
		Span::raw(card.attendance.clone()),
	]));
	lines.push(Line::from(vec![
		Span::raw(format!("{} ", glyph("ticket"))),
		Span::styled(
			card.price.label(),
			Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
		),
		Span::raw("   "),
		Span::styled(
			format!("View Details -> {}", card.detail_link.href),
			Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
		),
	]));

	lines
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
	let footer = Paragraph::new(vec![Line::from(format!(
		"j/k move | Enter detail | Esc close | q quit{}{}",
		if app.status.is_empty() { "" } else { " | " },
		app.status
	))])
	.block(Block::default().borders(Borders::ALL).title("Shortcuts"));
	frame.render_widget(footer, area);
}

fn render_detail_popup(frame: &mut Frame, card: &CardView) {
	let area = centered_rect(62, 55, frame.area());
	frame.render_widget(Clear, area);

	let mut lines = card_lines(card);
	lines.push(Line::from(""));
	lines.push(Line::from(Span::styled(
		format!("open: {}", card.detail_link.href),
		Style::default().fg(Color::Blue),
	)));

	let popup = Paragraph::new(lines)
		.wrap(Wrap { trim: false })
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title(card.title.clone())
				.border_style(Style::default().fg(FOCUSED_BORDER_COLOR)),
		);
	frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
	let popup_layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Percentage((100 - percent_y) / 2),
			Constraint::Percentage(percent_y),
			Constraint::Percentage((100 - percent_y) / 2),
		])
		.split(area);
	Layout::default()
		.direction(Direction::Horizontal)
		.constraints([
			Constraint::Percentage((100 - percent_x) / 2),
			Constraint::Percentage(percent_x),
			Constraint::Percentage((100 - percent_x) / 2),
		])
		.split(popup_layout[1])[1]
}

pub fn print_card(card: &CardView) {
	println!("[{}] {}", card.category, card.title);
	println!("date: {} {}", card.date_month(), card.date_day());
	println!("location: {}", card.location);
	if !card.description.is_empty() {
		println!("description: {}", card.description);
	}
	println!("organizer: By {}", card.organizer);
	println!("attendees: {}", card.attendance);
	println!("price: {}", card.price.label());
	match &card.media {
		MediaRegion::Photo { uri, .. } => println!("image: {uri}"),
		MediaRegion::Placeholder => println!("image: (placeholder)"),
	}
	println!("view: {}", card.detail_link.href);
}

pub fn print_card_list(catalog: &EventCatalog) {
	if catalog.events.is_empty() {
		println!("no events yet");
		return;
	}

	let router = TemplateRouter::default();
	for event in &catalog.events {
		let card = compose(event, &router);
		println!(
			"{:>3} {:>2} | {} | {} | {} | {} | {}",
			card.date_month(),
			card.date_day(),
			event.short_title(),
			card.location,
			card.price.label(),
			card.attendance,
			card.detail_link.href
		);
	}
}
