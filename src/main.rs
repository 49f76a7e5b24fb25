use std::cell::Cell;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, terminal};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect as Area};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::{Frame, Terminal};

use dnd_layout::board::{Board, BoardEvent, ContainerEvent, CrossContainerConfig};
use dnd_layout::container::{FlexContainer, GridContainer};
use dnd_layout::coordinator::{AcceptsDrop, DropZoneHandler, LayoutItem};
use dnd_layout::geometry::{Point, Rect};
use dnd_layout::layout::flex::{FlexConfig, FlexDirection, FlexLayoutItem};
use dnd_layout::layout::grid::{CompactMode, GridConfig, GridLayoutItem};
use dnd_layout::tracing_sub::{self, EventLogHandle};

const LEFT: &str = "left";
const RIGHT: &str = "right";
const SHELF: &str = "shelf";
const TRASH: &str = "trash";

#[derive(Parser, Debug)]
#[command(
    name = "dnd-layout",
    version = env!("CARGO_PKG_VERSION"),
    about = "Drag items between two grids, a flex shelf and a trash zone"
)]
struct DemoCli {
    /// Columns of the left grid.
    #[arg(long, default_value_t = 12)]
    left_columns: i32,

    /// Columns of the right grid.
    #[arg(long, default_value_t = 8)]
    right_columns: i32,

    /// Grid row height in terminal rows.
    #[arg(long, value_name = "ROWS", default_value_t = 3.0)]
    row_height: f64,

    /// Packing axis of both grids.
    #[arg(long, value_enum, default_value_t = CompactArg::Vertical)]
    compaction: CompactArg,

    /// Main axis of the shelf.
    #[arg(long, value_enum, default_value_t = DirectionArg::Row)]
    direction: DirectionArg,

    /// Gap between shelf items in terminal cells.
    #[arg(long, default_value_t = 1.0)]
    gap: f64,

    /// Frame interval in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 16)]
    tick_ms: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompactArg {
    Vertical,
    Horizontal,
    None,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

struct DemoConfig {
    left: GridConfig,
    right: GridConfig,
    shelf: FlexConfig,
    tick: Duration,
}

impl TryFrom<&DemoCli> for DemoConfig {
    type Error = String;

    fn try_from(cli: &DemoCli) -> Result<Self, Self::Error> {
        if !(1.0..=20.0).contains(&cli.row_height) {
            return Err("row height must be between 1 and 20".to_string());
        }
        if !(1..=240).contains(&cli.tick_ms) {
            return Err("tick must be between 1 and 240 ms".to_string());
        }
        let compaction = match cli.compaction {
            CompactArg::Vertical => CompactMode::Vertical,
            CompactArg::Horizontal => CompactMode::Horizontal,
            CompactArg::None => CompactMode::None,
        };
        let grid = |columns: i32| GridConfig {
            columns,
            row_height: cli.row_height,
            margin: [0.0, 0.0],
            container_padding: Some([0.0, 0.0]),
            compaction,
            ..GridConfig::default()
        };
        let left = grid(cli.left_columns);
        let right = grid(cli.right_columns);
        let shelf = FlexConfig {
            direction: match cli.direction {
                DirectionArg::Row => FlexDirection::Row,
                DirectionArg::RowReverse => FlexDirection::RowReverse,
                DirectionArg::Column => FlexDirection::Column,
                DirectionArg::ColumnReverse => FlexDirection::ColumnReverse,
            },
            gap: cli.gap,
            ..FlexConfig::default()
        };
        for config in [&left, &right] {
            config.validate().map_err(|err| err.to_string())?;
        }
        shelf.validate().map_err(|err| err.to_string())?;
        Ok(Self {
            left,
            right,
            shelf,
            tick: Duration::from_millis(cli.tick_ms),
        })
    }
}

/// Counts items dropped into the trash.
struct Trash {
    dropped: Rc<Cell<usize>>,
}

impl DropZoneHandler for Trash {
    fn on_drag_enter(&mut self, item: &LayoutItem, _pointer: Point) {
        tracing::debug!(item = %item.id(), "trash armed");
    }

    fn on_drag_leave(&mut self, item: &LayoutItem) {
        tracing::debug!(item = %item.id(), "trash disarmed");
    }

    fn on_drop(&mut self, item: &LayoutItem, _pointer: Point) {
        self.dropped.set(self.dropped.get() + 1);
        tracing::info!(item = %item.id(), "item trashed");
    }
}

/// Screen areas: a bordered block per target plus the log pane.
struct Regions {
    left: Area,
    right: Area,
    shelf: Area,
    trash: Area,
    log: Area,
}

impl Regions {
    fn split(area: Area) -> Self {
        let [top, middle, log] = Layout::vertical([
            Constraint::Percentage(55),
            Constraint::Length(7),
            Constraint::Min(3),
        ])
        .areas(area);
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(top);
        let [shelf, trash] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(16)]).areas(middle);
        Self {
            left,
            right,
            shelf,
            trash,
            log,
        }
    }

    fn targets(&self) -> [(&'static str, Area); 4] {
        [
            (LEFT, self.left),
            (RIGHT, self.right),
            (SHELF, self.shelf),
            (TRASH, self.trash),
        ]
    }
}

fn inner(area: Area) -> Rect {
    Rect::from(Block::bordered().inner(area))
}

struct App {
    board: Board,
    log: EventLogHandle,
    trashed: Rc<Cell<usize>>,
}

impl App {
    fn new(config: &DemoConfig, regions: &Regions, log: EventLogHandle) -> io::Result<Self> {
        let mut board = Board::new();
        let trashed = Rc::new(Cell::new(0));

        let left = GridContainer::new(
            LEFT,
            config.left.clone(),
            vec![
                GridLayoutItem::new("alpha", 0, 0, 4, 1),
                GridLayoutItem::new("beta", 4, 0, 3, 2),
                GridLayoutItem::new("gamma", 7, 0, 5, 1),
                GridLayoutItem::new("pinned", 0, 2, 4, 1).fixed(),
            ],
        )
        .map_err(io::Error::other)?;
        let right = GridContainer::new(
            RIGHT,
            config.right.clone(),
            vec![GridLayoutItem::new("delta", 0, 0, 4, 1)],
        )
        .map_err(io::Error::other)?;
        let shelf = FlexContainer::new(
            SHELF,
            config.shelf.clone(),
            vec![
                FlexLayoutItem::new("one", 0).with_basis(10.0),
                FlexLayoutItem::new("two", 1).with_basis(14.0),
                FlexLayoutItem::new("three", 2).with_basis(8.0),
            ],
        )
        .map_err(io::Error::other)?;

        board
            .mount_grid(left, inner(regions.left), CrossContainerConfig::default())
            .map_err(io::Error::other)?;
        board
            .mount_grid(
                right,
                inner(regions.right),
                CrossContainerConfig {
                    accepts: AcceptsDrop::when(|item, _source| item.id() != "pinned"),
                    ..CrossContainerConfig::default()
                },
            )
            .map_err(io::Error::other)?;
        board
            .mount_flex(shelf, inner(regions.shelf), CrossContainerConfig::default())
            .map_err(io::Error::other)?;
        board
            .mount_drop_zone(
                TRASH,
                inner(regions.trash),
                AcceptsDrop::Always,
                Trash {
                    dropped: Rc::clone(&trashed),
                },
            )
            .map_err(io::Error::other)?;

        Ok(Self {
            board,
            log,
            trashed,
        })
    }

    fn relayout(&mut self, regions: &Regions) {
        for (id, area) in regions.targets() {
            if let Err(err) = self.board.set_bounds(id, inner(area)) {
                tracing::warn!(target_id = id, %err, "could not move target");
            }
        }
    }

    fn handle_event(&mut self, event: &Event, regions: &Regions) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc if self.board.is_gesture_active() => self.board.cancel_gesture(),
                KeyCode::Char('q') | KeyCode::Esc => return true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return true;
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                let pointer = Point::new(mouse.column as f64, mouse.row as f64);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.board.pointer_down(pointer);
                    }
                    MouseEventKind::Drag(MouseButton::Left) => self.board.pointer_move(pointer),
                    MouseEventKind::Up(MouseButton::Left) => self.board.pointer_up(pointer),
                    _ => {}
                }
            }
            Event::Resize(_, _) => self.relayout(regions),
            _ => {}
        }
        false
    }

    fn drain_events(&mut self) {
        for BoardEvent { container, event } in self.board.take_events() {
            match event {
                ContainerEvent::Grid(event) => log_event(&container, event.name()),
                ContainerEvent::Flex(event) => log_event(&container, event.name()),
                ContainerEvent::ExternalDrop { item, .. } => {
                    tracing::debug!(container = %container, item = %item.id(), "external drop");
                }
            }
        }
    }
}

fn log_event(container: &str, name: &str) {
    if name == "drag" || name == "resize" {
        tracing::trace!(container, event = name);
    } else {
        tracing::debug!(container, event = name);
    }
}

fn main() -> io::Result<()> {
    let args = DemoCli::parse();
    let config = DemoConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let log = EventLogHandle::default();
    tracing_sub::set_global_event_log(log.clone());
    tracing_sub::init_default();

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        cursor::Hide
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &config, log.clone());

    terminal.show_cursor()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    )?;
    terminal::disable_raw_mode()?;

    let trashed = result?;
    println!(
        "{}",
        indoc::formatdoc!(
            r#"
            Session ended.
            Items trashed: {trashed} | Log lines kept: {lines}
            "#,
            lines = log.len(),
        )
    );
    Ok(())
}

type DemoTerminal = Terminal<CrosstermBackend<Stdout>>;

fn run(terminal: &mut DemoTerminal, config: &DemoConfig, log: EventLogHandle) -> io::Result<usize> {
    let size = terminal.size()?;
    let mut regions = Regions::split(Area::new(0, 0, size.width, size.height));
    let mut app = App::new(config, &regions, log)?;

    loop {
        terminal.draw(|frame| draw(frame, &app, &regions))?;
        if event::poll(config.tick)? {
            let event = event::read()?;
            if let Event::Resize(width, height) = event {
                regions = Regions::split(Area::new(0, 0, width, height));
            }
            if app.handle_event(&event, &regions) {
                break;
            }
        }
        app.board.on_frame();
        app.drain_events();
    }
    Ok(app.trashed.get())
}

fn draw(frame: &mut Frame, app: &App, regions: &Regions) {
    let board = &app.board;
    for (id, area) in regions.targets() {
        let state = board.drop_state(id);
        let border = if state.is_active {
            Style::default().fg(Color::Green)
        } else if state.is_source {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let title = if id == TRASH {
            format!(" {id} ({}) ", app.trashed.get())
        } else {
            format!(" {id} ")
        };
        frame.render_widget(Block::bordered().title(title).border_style(border), area);
    }

    let screen = frame.area();
    for (id, area) in regions.targets() {
        if let Some(grid) = board.grid(id) {
            let clip = Block::bordered().inner(area);
            for item in grid.layout() {
                let Some(rect) = board.grid_item_rect(id, &item.id) else {
                    continue;
                };
                let style = if item.is_static {
                    Style::default().fg(Color::DarkGray)
                } else if grid.active_placeholder().is_some_and(|p| p.id == item.id) {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                draw_item(frame, rect, clip, display_id(&item.id), style);
            }
        } else if let Some(flex) = board.flex(id) {
            let clip = Block::bordered().inner(area);
            let Some(rects) = board.flex_item_rects(id) else {
                continue;
            };
            for (item_id, rect) in rects {
                let rect = rect.translated(flex.offset(&item_id));
                let style = if flex.item(&item_id).is_some_and(|item| item.is_placeholder) {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Magenta)
                };
                draw_item(frame, rect, clip, display_id(&item_id), style);
            }
        }
    }

    if let Some(session) = board.coordinator().session() {
        let size = session.measured_size.unwrap_or_default();
        let ghost = Rect::new(
            session.pointer.x - session.grab_offset.x,
            session.pointer.y - session.grab_offset.y,
            size.width.max(3.0),
            size.height.max(1.0),
        );
        draw_item(
            frame,
            ghost,
            screen,
            session.item.id(),
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        );
    }

    let lines: Vec<Line> = app
        .log
        .tail(regions.log.height.saturating_sub(2) as usize)
        .into_iter()
        .map(Line::from)
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(" events (q to quit, esc cancels) ")),
        regions.log,
    );
}

fn display_id(id: &str) -> &str {
    id.strip_prefix(dnd_layout::constants::EXTERNAL_ITEM_PREFIX)
        .unwrap_or(id)
}

fn draw_item(frame: &mut Frame, rect: Rect, clip: Area, label: &str, style: Style) {
    if rect.width < 1.0 || rect.height < 1.0 || rect.left < 0.0 || rect.top < 0.0 {
        return;
    }
    let area = Area::new(
        rect.left.round() as u16,
        rect.top.round() as u16,
        rect.width.round() as u16,
        rect.height.round() as u16,
    )
    .intersection(clip);
    if area.width == 0 || area.height == 0 {
        return;
    }
    let widget = if area.height >= 3 && area.width >= 3 {
        Paragraph::new(label).block(Block::bordered().border_style(style))
    } else {
        Paragraph::new(label)
    };
    frame.render_widget(widget.style(style), area);
}
