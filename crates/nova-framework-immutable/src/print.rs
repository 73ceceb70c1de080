//! Java source printer for [`WrapperClass`].

use nova_types::Parameter;

use crate::ir::{MethodBody, MethodDecl, WrapperClass};
use crate::resolve::MethodKind;

/// Rendering configuration for [`print`].
#[derive(Debug, Clone, Copy)]
pub struct PrintConfig {
    pub indent_width: usize,
    /// Emit `// Immutable methods` / `// Other methods` section markers.
    pub section_comments: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            section_comments: true,
        }
    }
}

const OVERRIDE: &str = "@java.lang.Override";

struct Printer {
    out: String,
    depth: usize,
    config: PrintConfig,
}

impl Printer {
    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            self.out
                .extend(std::iter::repeat(' ').take(self.depth * self.config.indent_width));
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.line("");
    }

    fn open(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }
}

pub fn print(class: &WrapperClass, config: PrintConfig) -> String {
    let mut p = Printer {
        out: String::new(),
        depth: 0,
        config,
    };

    if let Some(package) = &class.package {
        p.line(&format!("package {package};"));
        p.blank();
    }

    p.open(&format!("public class {} extends {}", class.name, class.parent));
    p.line(&format!("private final {} {};", class.field.ty, class.field.name));
    p.blank();

    let param = &class.constructor.param;
    p.open(&format!("public {}({} {})", class.name, param.ty, param.name));
    p.line(&format!("this.{} = {};", class.field.name, param.name));
    p.close();

    print_section(&mut p, class, MethodKind::Mutating, "// Immutable methods");
    print_section(&mut p, class, MethodKind::Forwarding, "// Other methods");

    p.close();
    p.out
}

fn print_section(p: &mut Printer, class: &WrapperClass, kind: MethodKind, comment: &str) {
    let mut methods = class.methods.iter().filter(|m| m.kind == kind).peekable();
    if methods.peek().is_none() {
        return;
    }

    p.blank();
    if p.config.section_comments {
        p.line(comment);
    }
    for (idx, method) in methods.enumerate() {
        if idx > 0 {
            p.blank();
        }
        print_method(p, method);
    }
}

fn print_method(p: &mut Printer, method: &MethodDecl) {
    p.line(OVERRIDE);

    let mut header = String::new();
    if let Some(modifier) = method.visibility.keyword() {
        header.push_str(modifier);
        header.push(' ');
    }
    header.push_str(&format!(
        "{} {}({})",
        method.return_type,
        method.name,
        parameter_list(&method.params)
    ));
    p.open(&header);

    match &method.body {
        MethodBody::Reject { exception } => p.line(&format!("throw new {exception}();")),
        MethodBody::Forward {
            field,
            method,
            args,
            returns,
        } => {
            let prefix = if *returns { "return " } else { "" };
            p.line(&format!("{prefix}this.{field}.{method}({});", args.join(", ")));
        }
    }
    p.close();
}

fn parameter_list(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|param| format!("{} {}", param.ty, param.name))
        .collect::<Vec<_>>()
        .join(", ")
}
