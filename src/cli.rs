//! Interface de linha de comando do waitlist baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (submit, validate,
//! widget, messages) e flags globais (--config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// waitlist: inscrição na lista de acesso antecipado.
#[derive(Debug, Parser)]
#[command(name = "waitlist", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: ./waitlist.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Envia um e-mail para a lista de espera.
    Submit {
        /// Endereço de e-mail a inscrever.
        email: String,

        /// Prazo da requisição em segundos (sobrepõe a configuração).
        #[arg(long)]
        timeout: Option<u64>,

        /// Sai logo após exibir o resultado, sem aguardar a notificação expirar.
        #[arg(long, default_value_t = false)]
        no_wait: bool,

        /// Não registra o evento de analytics.
        #[arg(long, default_value_t = false)]
        no_analytics: bool,
    },

    /// Verifica se um e-mail seria aceito, sem enviar nada.
    Validate {
        email: String,
    },

    /// Imprime o snippet de embed do widget de chat.
    Widget,

    /// Lista as categorias de erro e suas mensagens.
    Messages,
}
