//! Main loop: input → session → audio, and scene → terminal.

use std::{
    io::stdout,
    time::{Duration, Instant},
};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
};
use ratatui::{layout::Rect, DefaultTerminal};
use rtrb::{Consumer, RingBuffer};

use physynth::{
    bridge::{Button, Command, InputEvent, Reaction},
    io::AudioOutput,
    physics::Bounds,
    Session, SynthConfig,
};

use crate::ui::{self, field::cell_to_world, spectrum::SpectrumAnalyzer, status::Status};

/// Samples kept for the scope and the FFT.
const VIS_BUFFER_SIZE: usize = 2048;
/// Room for two device callbacks between UI frames.
const SCOPE_RING: usize = 8192;
const FRAME: Duration = Duration::from_millis(16);
/// Longest step handed to the physics after a stall.
const MAX_DT: f32 = 0.05;

pub struct App {
    session: Session,
    output: AudioOutput,
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    /// Field frame of the last draw, for mapping mouse cells back to the world.
    field: Rect,
    bounds: Bounds,
    last_reaction: Reaction,
    should_quit: bool,
}

impl App {
    pub fn new(config: SynthConfig) -> EyreResult<Self> {
        let (session, engine) = Session::new(&config).wrap_err("failed to build session")?;

        let (scope_tx, scope_rx) = RingBuffer::new(SCOPE_RING);
        let mut output = AudioOutput::open(engine.with_scope(scope_tx))
            .wrap_err("failed to open audio output")?;
        output.start().wrap_err("failed to start audio output")?;

        let bounds = config.physics.bounds.unwrap_or(config.mapping.frame);
        let spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, output.sample_rate() as f32);

        Ok(Self {
            session,
            output,
            scope_rx,
            scope: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            field: Rect::default(),
            bounds,
            last_reaction: Reaction::None,
            should_quit: false,
        })
    }

    /// Take over the terminal until the user quits.
    pub fn run(mut self) -> EyreResult<()> {
        let mut terminal = ratatui::init();
        let result = execute!(stdout(), EnableMouseCapture)
            .wrap_err("failed to enable mouse capture")
            .and_then(|()| self.event_loop(&mut terminal));

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();
        if let Err(err) = self.output.stop() {
            tracing::warn!(%err, "failed to stop output stream");
        }
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let mut last = Instant::now();

        while !self.should_quit {
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32().min(MAX_DT);
            last = now;

            self.session.tick(dt);
            self.poll_scope();
            self.spectrum.update(&self.scope);

            let scene = self.session.scene();
            let status = Status {
                device: self.output.state(),
                sample_rate: self.output.sample_rate(),
                channels: self.output.channels(),
                frames: self.session.state().bay().frames_rendered(),
                nodes: scene.bodies.len(),
                links: scene.links.len(),
                pending: self.session.bridge().pending(),
                reaction: self.last_reaction,
            };

            let mut field = self.field;
            terminal.draw(|frame| {
                field = ui::render(
                    frame,
                    &scene,
                    self.bounds,
                    &self.scope,
                    self.spectrum.data(),
                    &status,
                );
            })?;
            self.field = field;

            if event::poll(FRAME)? {
                self.handle(event::read()?);
                // Drain bursts of mouse motion before the next frame.
                while event::poll(Duration::ZERO)? {
                    self.handle(event::read()?);
                }
            }
        }

        Ok(())
    }

    fn poll_scope(&mut self) {
        let fresh = self.scope_rx.slots();
        if fresh == 0 {
            return;
        }
        self.scope.reserve(fresh);
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
        }
        if self.scope.len() > VIS_BUFFER_SIZE {
            let excess = self.scope.len() - VIS_BUFFER_SIZE;
            self.scope.drain(..excess);
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let command = match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('o') => Command::SpawnOscillator,
            KeyCode::Char('l') => Command::SpawnLfo,
            KeyCode::Char('p') => Command::SpawnOutput,
            KeyCode::Char('x') | KeyCode::Delete => Command::Remove,
            KeyCode::Char('d') => Command::Disconnect,
            _ => return,
        };
        self.dispatch(InputEvent::Key(command));
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if let Some(point) = cell_to_world(self.field, self.bounds, mouse.column, mouse.row) {
            self.dispatch(InputEvent::PointerMoved(point));
        }
        let event = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => InputEvent::ButtonDown(Button::Primary),
            MouseEventKind::Up(MouseButton::Left) => InputEvent::ButtonUp(Button::Primary),
            MouseEventKind::Down(MouseButton::Right) => InputEvent::ButtonDown(Button::Secondary),
            MouseEventKind::Up(MouseButton::Right) => InputEvent::ButtonUp(Button::Secondary),
            _ => return,
        };
        self.dispatch(event);
    }

    fn dispatch(&mut self, event: InputEvent) {
        let reaction = self.session.handle(event);
        if reaction != Reaction::None {
            self.last_reaction = reaction;
        }
    }
}
