use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{Duration, Instant, SystemTime},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, ModifierKeyCode, MouseButton, MouseEvent,
        MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use saccade_tui::engine::SentenceNavigator;
use saccade_tui::layout::PointerGeometry;
use saccade_tui::markdown;
use saccade_tui::page::{NodeId, Page};
use saccade_tui::pointer::{PointerEvent, PointerEventKind};
use saccade_tui::render::{RenderedPage, ScreenLayout, render_page};
use saccade_tui::segment::UnicodeSegmenter;
use saccade_tui::theme::Theme;
use saccade_tui::tooltip::TooltipHost;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);
const MOUSE_SCROLL_LINES: usize = 3;

/// Read a Markdown file and step through it sentence by sentence.
#[derive(Parser)]
#[command(name = "saccade")]
#[command(version, about = "Sentence-level navigation for rendered Markdown")]
struct Args {
    /// Markdown file to open
    file: PathBuf,

    /// Locale handed to the sentence segmenter
    #[arg(long, default_value = "en")]
    locale: String,

    /// Content drift poll interval in milliseconds
    #[arg(long, value_name = "MS")]
    poll_interval: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging()?;
    run(args)
}

/// File logging is off unless `SACCADE_LOG` carries a filter; stderr is
/// not usable while the alternate screen is up.
fn init_logging() -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Ok(filter) = std::env::var("SACCADE_LOG") else {
        return Ok(None);
    };
    let file = fs::File::create("saccade.log").context("failed to create saccade.log")?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

fn run(args: Args) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let page = markdown::parse_page(&content);
    let modified = file_modified(&args.file);

    let mut navigator = SentenceNavigator::with_segmenter(UnicodeSegmenter::new(&args.locale));
    if let Some(ms) = args.poll_interval {
        navigator.set_poll_interval(Duration::from_millis(ms));
    }
    let mut app = App::new(page, navigator, args.file, modified);

    enable_raw_mode().context("failed to enable raw mode")?;
    // Detected after raw mode is on; the query needs a raw terminal.
    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to initialize terminal")?;
    if keyboard_enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .ok();
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    if keyboard_enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags).ok();
    }
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    res
}

fn file_modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    // Pointer dispatch deadlines sit at 100 ms, so tick at least that often.
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    while !app.should_quit() {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt);
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

struct App {
    page: Page,
    navigator: SentenceNavigator,
    tooltips: TooltipHost,
    theme: Theme,
    file_path: PathBuf,
    file_modified: Option<SystemTime>,
    scroll_top: usize,
    follow_focus: bool,
    hovered: Option<NodeId>,
    screen: Option<ScreenLayout>,
    scrollbar_drag: Option<usize>,
    last_viewport_height: usize,
    last_total_lines: usize,
    last_scrollbar_column: u16,
    status_message: Option<(String, Instant)>,
    should_quit: bool,
}

impl App {
    fn new(
        page: Page,
        navigator: SentenceNavigator,
        file_path: PathBuf,
        file_modified: Option<SystemTime>,
    ) -> Self {
        Self {
            page,
            navigator,
            tooltips: TooltipHost::new(),
            theme: Theme::new(),
            file_path,
            file_modified,
            scroll_top: 0,
            follow_focus: false,
            hovered: None,
            screen: None,
            scrollbar_drag: None,
            last_viewport_height: 0,
            last_total_lines: 0,
            last_scrollbar_column: 0,
            status_message: None,
            should_quit: false,
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let content_area = vertical[0];
        let status_area = vertical[1];

        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(content_area);
        let text_area = horizontal[0];
        let scrollbar_area = horizontal[1];

        let rendered = render_page(&self.page, text_area.width.max(1), &self.theme);
        let viewport_height = text_area.height as usize;
        self.adjust_scroll(&rendered, viewport_height);

        self.last_viewport_height = viewport_height;
        self.last_total_lines = rendered.total_lines;
        self.last_scrollbar_column = scrollbar_area.x;

        let paragraph = Paragraph::new(Text::from(rendered.lines.clone()))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::NONE))
            .style(Style::default().bg(self.theme.background))
            .scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, text_area);

        // Hit-test geometry for this frame; pointer dispatches between now
        // and the next draw resolve against it.
        let screen = rendered.screen_layout(&self.page, text_area, self.scroll_top, &self.theme);
        for popup in &screen.popups {
            frame.render_widget(Clear, popup.area);
            frame.render_widget(
                Paragraph::new(Text::from(popup.lines.clone())),
                popup.area,
            );
        }
        self.screen = Some(screen);

        self.draw_scrollbar(frame, scrollbar_area);

        let status_line = self.status_line(status_area.width as usize);
        let status_widget = Paragraph::new(status_line)
            .block(Block::default().borders(Borders::NONE))
            .style(self.theme.status_bar_style());
        frame.render_widget(status_widget, status_area);
    }

    fn draw_scrollbar(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 || self.last_total_lines <= self.last_viewport_height {
            return;
        }

        let Some((knob_start, knob_size)) = self.scrollbar_geometry() else {
            return;
        };
        let knob_end = knob_start.saturating_add(knob_size);

        for row in 0..self.last_viewport_height.min(area.height as usize) {
            let y = area.y + row as u16;
            let style = if row >= knob_start && row < knob_end {
                self.theme.scrollbar_knob_style()
            } else {
                self.theme.scrollbar_track_style()
            };
            let span = Span::styled(" ", style);
            frame.render_widget(Paragraph::new(Line::from(span)), Rect::new(area.x, y, 1, 1));
        }
    }

    fn status_line(&mut self, terminal_width: usize) -> Line<'static> {
        self.prune_status_message();

        // If there's a status message, show it prominently
        if let Some((message, _)) = &self.status_message {
            return Line::from(vec![
                Span::raw(format!("{} ", self.position_text())),
                Span::raw(message.clone()),
            ]);
        }

        let filename = self.file_path.display().to_string();

        // Shortcuts ordered from least to most important
        let all_shortcuts: Vec<&str> = if self.navigator.is_active() {
            vec!["Shift:Select", "d:Click", "s/w:Step", "Esc:Off", "^Q:Quit"]
        } else {
            vec!["^⌥R:Sentences", "^Q:Quit"]
        };

        let mut spans = Vec::new();
        spans.push(Span::styled(
            self.position_text(),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(filename, self.theme.filename_style()));

        let left_width: usize = spans.iter().map(|span| span.content.chars().count()).sum();

        // Fit shortcuts from most to least important
        let min_padding = 1;
        let mut shortcuts_to_show = Vec::new();
        let mut shortcuts_width = 0;
        for shortcut in all_shortcuts.iter().rev() {
            let test_width = if shortcuts_to_show.is_empty() {
                shortcut.chars().count()
            } else {
                shortcuts_width + 1 + shortcut.chars().count()
            };
            if left_width + min_padding + test_width <= terminal_width {
                shortcuts_to_show.insert(0, *shortcut);
                shortcuts_width = test_width;
            } else {
                break;
            }
        }

        let shortcuts_text = shortcuts_to_show.join(" ");
        if !shortcuts_text.is_empty() {
            let padding = terminal_width
                .saturating_sub(left_width)
                .saturating_sub(shortcuts_width)
                .max(min_padding);
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(Span::styled(
                shortcuts_text,
                Style::default().fg(Color::White),
            ));
        }

        Line::from(spans)
    }

    fn position_text(&self) -> String {
        if self.navigator.is_active() {
            let total = self.navigator.units().len();
            if total == 0 {
                "[0/0]".to_string()
            } else {
                format!("[{}/{}]", self.navigator.current_index() + 1, total)
            }
        } else {
            format!("[{}]", self.scroll_top + 1)
        }
    }

    fn prune_status_message(&mut self) {
        if let Some((_, instant)) = &self.status_message
            && instant.elapsed() > STATUS_TIMEOUT
        {
            self.status_message = None;
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn adjust_scroll(&mut self, rendered: &RenderedPage, viewport_height: usize) {
        let viewport = viewport_height.max(1);
        let max_scroll = rendered.total_lines.saturating_sub(viewport);
        if self.scroll_top > max_scroll {
            self.scroll_top = max_scroll;
        }
        if self.follow_focus
            && let Some(focus) = rendered.focus_line
        {
            self.scroll_top = self.scroll_top_for_line(focus, viewport, max_scroll);
        }
    }

    fn scroll_top_for_line(&self, line: usize, viewport: usize, max_scroll: usize) -> usize {
        let mut scroll = self.scroll_top.min(max_scroll);
        if viewport == 0 {
            return scroll;
        }

        let margin = if viewport >= 3 { 1 } else { 0 };
        if margin == 0 {
            if line < scroll {
                scroll = line;
            } else if line >= scroll.saturating_add(viewport) {
                let offset = viewport.saturating_sub(1);
                scroll = line.saturating_sub(offset);
            }
        } else {
            let top_limit = scroll.saturating_add(margin);
            let bottom_offset = viewport.saturating_sub(1).saturating_sub(margin);
            let bottom_limit = scroll.saturating_add(bottom_offset);
            if line < top_limit {
                scroll = line.saturating_sub(margin);
            } else if line > bottom_limit {
                scroll = line.saturating_sub(bottom_offset);
            }
        }

        scroll.min(max_scroll)
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            // Only terminals speaking the enhanced keyboard protocol send
            // these; elsewhere the modifier is sampled from step keys.
            if matches!(
                key.code,
                KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift)
            ) {
                self.navigator.set_extend_held(&mut self.page, false);
            }
            return;
        }

        match key.code {
            KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
                self.navigator.set_extend_held(&mut self.page, true);
            }
            KeyCode::Char('q' | 'Q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('r' | 'R')
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.activate();
            }
            KeyCode::Esc if self.navigator.is_active() => {
                self.navigator.deactivate(&mut self.page);
                self.follow_focus = false;
                self.set_status("Sentence navigation off");
            }
            KeyCode::Char('s' | 'S')
                if self.navigator.is_active() && !has_chord_modifier(key.modifiers) =>
            {
                self.sample_extend(key.modifiers);
                if self.navigator.step_forward(&mut self.page, Instant::now()) {
                    self.follow_focus = true;
                }
            }
            KeyCode::Char('w' | 'W')
                if self.navigator.is_active() && !has_chord_modifier(key.modifiers) =>
            {
                self.sample_extend(key.modifiers);
                if self.navigator.step_backward(&mut self.page, Instant::now()) {
                    self.follow_focus = true;
                }
            }
            KeyCode::Char('d' | 'D')
                if self.navigator.is_active() && !has_chord_modifier(key.modifiers) =>
            {
                // Bring the focused sentence on screen before the hover
                // geometry is sampled on the next tick.
                self.follow_focus = true;
                self.navigator
                    .request_click_through(&mut self.page, Instant::now());
            }
            KeyCode::Up => self.scroll_by_lines(-1),
            KeyCode::Down => self.scroll_by_lines(1),
            KeyCode::PageUp => self.scroll_by_lines(-(self.last_viewport_height.max(1) as isize)),
            KeyCode::PageDown => self.scroll_by_lines(self.last_viewport_height.max(1) as isize),
            KeyCode::Home => {
                self.follow_focus = false;
                self.scroll_top = 0;
            }
            KeyCode::End => {
                self.follow_focus = false;
                self.scroll_top = self
                    .last_total_lines
                    .saturating_sub(self.last_viewport_height.max(1));
            }
            _ => {}
        }
    }

    fn activate(&mut self) {
        self.navigator.activate(&mut self.page, Instant::now());
        self.follow_focus = true;
        let total = self.navigator.units().len();
        self.set_status(format!("Sentence navigation: {total} sentences"));
    }

    /// Terminals without release reporting still set SHIFT on the step
    /// keystroke, so the extend state is taken from there.
    fn sample_extend(&mut self, modifiers: KeyModifiers) {
        let held = modifiers.contains(KeyModifiers::SHIFT);
        if held != self.navigator.extend_held() {
            self.navigator.set_extend_held(&mut self.page, held);
        }
    }

    fn handle_mouse_event(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.scroll_by_lines(-(MOUSE_SCROLL_LINES as isize));
            }
            MouseEventKind::ScrollDown => {
                self.scroll_by_lines(MOUSE_SCROLL_LINES as isize);
            }
            MouseEventKind::Down(MouseButton::Left) => self.handle_mouse_down(event),
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.scrollbar_drag.is_some() {
                    self.update_scrollbar_drag(event.row as usize);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.handle_mouse_up(event),
            MouseEventKind::Moved => {
                // While a simulated interaction owns the pointer, real mouse
                // motion must not compete with the synthetic hover stream.
                if !self.page.cursor_hidden() {
                    self.deliver_hover(event.column, event.row);
                }
            }
            _ => {}
        }
    }

    fn handle_mouse_down(&mut self, event: MouseEvent) {
        if event.column == self.last_scrollbar_column
            && (event.row as usize) < self.last_viewport_height
        {
            self.follow_focus = false;
            self.begin_scrollbar_drag(event.row as usize);
            return;
        }
        self.deliver_pointer(PointerEventKind::Down, event.column, event.row);
    }

    fn handle_mouse_up(&mut self, event: MouseEvent) {
        if self.scrollbar_drag.take().is_some() {
            return;
        }
        self.deliver_pointer(PointerEventKind::Up, event.column, event.row);
        let clicked = self.deliver_pointer(PointerEventKind::Click, event.column, event.row);
        if let Some(target) = clicked {
            self.jump_to_unit_at(target);
        }
    }

    /// Resolves the screen position against the last drawn frame and
    /// routes one event through the popup host. Returns the target, if
    /// the position resolved to one.
    fn deliver_pointer(
        &mut self,
        kind: PointerEventKind,
        column: u16,
        row: u16,
    ) -> Option<NodeId> {
        let position = Position::new(column, row);
        let target = {
            let screen = self.screen.as_ref()?;
            screen.map.element_at(position)?
        };
        let event = PointerEvent {
            kind,
            position,
            target,
        };
        self.tooltips.deliver(&mut self.page, &event);
        Some(target)
    }

    fn deliver_hover(&mut self, column: u16, row: u16) {
        let position = Position::new(column, row);
        let target = {
            let Some(screen) = self.screen.as_ref() else {
                return;
            };
            let Some(target) = screen.map.element_at(position) else {
                return;
            };
            target
        };

        // Crossing into another element gets the full transition burst so
        // the popup host sees the hover leave the old one.
        let changed = self.hovered != Some(target);
        self.hovered = Some(target);

        let mut kinds = Vec::new();
        if changed {
            kinds.extend([
                PointerEventKind::Leave,
                PointerEventKind::Out,
                PointerEventKind::Enter,
            ]);
        }
        kinds.extend([PointerEventKind::Move, PointerEventKind::Over]);

        for kind in kinds {
            let event = PointerEvent {
                kind,
                position,
                target,
            };
            self.tooltips.deliver(&mut self.page, &event);
        }
    }

    fn jump_to_unit_at(&mut self, target: NodeId) {
        if !self.navigator.is_active() {
            return;
        }
        let mut current = Some(target);
        while let Some(id) = current {
            if self.page.is_unit(id) {
                if self.navigator.jump_to(&mut self.page, id) {
                    self.follow_focus = true;
                }
                return;
            }
            current = self.page.parent_of(id);
        }
    }

    fn scroll_by_lines(&mut self, delta: isize) {
        if delta == 0 {
            return;
        }
        self.follow_focus = false;
        let viewport = self.last_viewport_height.max(1);
        let max_scroll = self.last_total_lines.saturating_sub(viewport) as isize;
        let new_scroll = (self.scroll_top as isize + delta).clamp(0, max_scroll.max(0));
        self.scroll_top = new_scroll as usize;
    }

    fn scrollbar_geometry(&self) -> Option<(usize, usize)> {
        if self.last_viewport_height == 0 || self.last_total_lines <= self.last_viewport_height {
            return None;
        }

        let mut knob_size =
            (self.last_viewport_height * self.last_viewport_height) / self.last_total_lines;
        knob_size = knob_size.clamp(1, self.last_viewport_height);
        let max_scroll = self.last_total_lines - self.last_viewport_height;
        let knob_travel = self.last_viewport_height - knob_size;
        let knob_start = if max_scroll == 0 || knob_travel == 0 {
            0
        } else {
            (self.scroll_top * knob_travel) / max_scroll
        };

        Some((knob_start, knob_size))
    }

    fn scroll_offset_from_knob_start(&self, knob_start: usize, knob_size: usize) -> usize {
        let max_scroll = self.last_total_lines.saturating_sub(self.last_viewport_height);
        if max_scroll == 0 {
            return 0;
        }

        let knob_travel = self.last_viewport_height.saturating_sub(knob_size);
        if knob_travel == 0 {
            return self.scroll_top.min(max_scroll);
        }

        let clamped_start = knob_start.min(knob_travel);
        (clamped_start * max_scroll + knob_travel / 2) / knob_travel
    }

    fn begin_scrollbar_drag(&mut self, pointer_row: usize) {
        self.scrollbar_drag = None;
        let Some((knob_start, knob_size)) = self.scrollbar_geometry() else {
            return;
        };

        let knob_end = knob_start.saturating_add(knob_size);
        let knob_travel = self.last_viewport_height.saturating_sub(knob_size);

        let anchor = if pointer_row < knob_start || pointer_row >= knob_end {
            // Clicked the track: jump so the knob centers on the pointer,
            // then drag from its middle.
            let anchor = (knob_size / 2).min(knob_size.saturating_sub(1));
            let target_start = pointer_row.saturating_sub(anchor).min(knob_travel);
            let max_scroll = self.last_total_lines.saturating_sub(self.last_viewport_height);
            self.scroll_top = self
                .scroll_offset_from_knob_start(target_start, knob_size)
                .min(max_scroll);
            anchor
        } else {
            (pointer_row - knob_start).min(knob_size.saturating_sub(1))
        };

        self.scrollbar_drag = Some(anchor);
    }

    fn update_scrollbar_drag(&mut self, pointer_row: usize) {
        let Some(anchor) = self.scrollbar_drag else {
            return;
        };
        let Some((_, knob_size)) = self.scrollbar_geometry() else {
            return;
        };

        let knob_travel = self.last_viewport_height.saturating_sub(knob_size);
        let adjusted_anchor = anchor.min(knob_size.saturating_sub(1));
        let target_start = pointer_row.saturating_sub(adjusted_anchor).min(knob_travel);
        let max_scroll = self.last_total_lines.saturating_sub(self.last_viewport_height);
        self.scroll_top = self
            .scroll_offset_from_knob_start(target_start, knob_size)
            .min(max_scroll);
    }

    fn on_tick(&mut self) {
        self.prune_status_message();
        self.watch_file();

        if let Some(screen) = &self.screen {
            let events = self
                .navigator
                .on_tick(&mut self.page, &screen.map, Instant::now());
            for event in &events {
                self.tooltips.deliver(&mut self.page, event);
            }
        }
        self.tooltips.on_tick(&mut self.page);
    }

    /// Re-reads the file when its mtime moves. The body is rewritten in
    /// place, so an active navigator notices the vanished units and
    /// rebuilds on its own.
    fn watch_file(&mut self) {
        let modified = file_modified(&self.file_path);
        if modified == self.file_modified {
            return;
        }
        self.file_modified = modified;

        match fs::read_to_string(&self.file_path) {
            Ok(content) => {
                markdown::replace_body(&mut self.page, &content);
                self.hovered = None;
                info!(path = %self.file_path.display(), "reloaded changed file");
                self.set_status("File changed on disk, reloaded");
            }
            Err(err) => {
                self.set_status(format!("Reload failed: {err}"));
            }
        }
    }
}

fn has_chord_modifier(modifiers: KeyModifiers) -> bool {
    modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}
