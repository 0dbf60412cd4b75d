//! Interface de terminal do waitlist: spinner e notificações coloridas.
//!
//! Usa `indicatif` para o spinner enquanto a inscrição está pendente e
//! `console` para o toast de resultado. O terminal faz o papel da camada de
//! apresentação da página.

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use crate::classifier::ErrorCategory;
use crate::notification::{Notice, Status};

/// Spinner mostrado enquanto a inscrição está pendente.
pub struct SubmitProgress {
    pb: ProgressBar,
}

impl SubmitProgress {
    /// Inicia o spinner; equivale ao botão desabilitado com "Entrando...".
    pub fn start() -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Entrando...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}

/// Renderiza o estado de uma notificação como um toast de uma linha.
pub struct Toast {
    term: Term,
    green: Style,
    red: Style,
    dim: Style,
    shown: bool,
}

impl Toast {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
            shown: false,
        }
    }

    /// Linha do toast, sem estilo, para o estado atual. `None` quando não há
    /// nada a exibir.
    pub fn line(notice: &Notice) -> Option<String> {
        let message = notice.message.as_deref()?;
        match notice.status {
            Status::Succeeded => Some(format!("✓ {message}")),
            Status::Failed => Some(format!("✗ {message}")),
            Status::Idle | Status::Pending => None,
        }
    }

    pub fn show(&mut self, notice: &Notice, dismissable: bool) {
        let Some(line) = Self::line(notice) else {
            return;
        };
        let styled = match notice.status {
            Status::Succeeded => self.green.apply_to(line),
            _ => self.red.apply_to(line),
        };
        if dismissable {
            println!("{styled}  {}", self.dim.apply_to("[Enter ×]"));
        } else {
            println!("{styled}");
        }
        self.shown = true;
    }

    /// Apaga o toast exibido, se houver.
    pub fn clear(&mut self) {
        self.erase(1);
    }

    /// Apaga o toast fechado com Enter; o eco da tecla ocupa mais uma linha.
    pub fn dismissed(&mut self) {
        self.erase(2);
    }

    fn erase(&mut self, lines: usize) {
        if self.shown {
            let _ = self.term.clear_last_lines(lines);
            self.shown = false;
        }
    }
}

impl Default for Toast {
    fn default() -> Self {
        Self::new()
    }
}

/// Lista as categorias de erro com suas mensagens fixas.
pub fn print_messages() {
    let bold = Style::new().bold();
    for category in ErrorCategory::ALL {
        println!("{:<20} {}", bold.apply_to(category), category.message());
    }
}
