use colored::Colorize;
use std::io::{self, Write};

pub struct RenderOpts {
    pub show_examples: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        RenderOpts {
            show_examples: true,
        }
    }
}

/// Help shown by `help` inside the interactive session
pub fn render_help<W: Write>(mut out: W, opts: &RenderOpts) -> io::Result<()> {
    writeln!(out, "{}", "Premio - Ajuda".bold())?;
    writeln!(out)?;

    writeln!(out, "{}", "Tela de valor:".bold())?;
    writeln!(
        out,
        "  {:24} - Digite o prêmio; os dois últimos dígitos são centavos",
        "<dígitos>"
    )?;
    writeln!(
        out,
        "  {:24} - Simula a renda (valor precisa ser maior que zero)",
        "Enter"
    )?;

    writeln!(out)?;
    writeln!(out, "{}", "Tela de resultados:".bold())?;
    writeln!(out, "  {:24} - Nova simulação", "n / nova")?;

    writeln!(out)?;
    writeln!(out, "{}", "Sessão:".bold())?;
    writeln!(out, "  {:24} - Mostra esta ajuda", "help / ?")?;
    writeln!(out, "  {:24} - Sai do programa", "q / sair / Ctrl-D")?;

    writeln!(out)?;
    if opts.show_examples {
        writeln!(out, "{}", "Exemplos (linha de comando):".bold())?;
        writeln!(out, "  premio simulate 100000000")?;
        writeln!(out, "  premio simulate 2.500.000,00 --option selic")?;
        writeln!(out, "  premio rates --offline --json")?;
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_session_keys() {
        let mut buf = Vec::new();
        render_help(&mut buf, &RenderOpts::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Nova simulação"));
        assert!(text.contains("premio simulate 100000000"));
    }

    #[test]
    fn examples_can_be_hidden() {
        let mut buf = Vec::new();
        render_help(
            &mut buf,
            &RenderOpts {
                show_examples: false,
            },
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains("Exemplos"));
    }
}
