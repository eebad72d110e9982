use fg_core::models::{ClassInfo, InjectedDependency, ParameterDetail, PropertyInfo, RoleTag};
use fg_core::parsers::{ClassDecl, DecoratorDecl, ExprKind, MethodDecl, ParamDecl, PropertyDecl};
use fg_core::SourceUnit;

/// Placeholder name for `export default class { ... }`
pub const ANONYMOUS_CLASS: &str = "AnonymousClass";

/// Type text used when nothing was declared
pub const UNKNOWN_TYPE: &str = "any";

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "static",
    "async",
    "override",
    "readonly",
    "abstract",
    "declare",
];

/// One class of a unit together with the facts derived from it
#[derive(Debug, Clone)]
pub struct AnalyzedClass<'u> {
    pub info: ClassInfo,
    /// `false` for anonymous default exports
    pub named: bool,
    pub decl: &'u ClassDecl,
}

impl<'u> AnalyzedClass<'u> {
    pub fn methods(&self) -> impl Iterator<Item = &'u MethodDecl> {
        self.decl.methods.iter()
    }
}

/// Derives [`ClassInfo`] from parsed class declarations
pub struct ClassAnalyzer;

impl ClassAnalyzer {
    pub fn analyze(unit: &SourceUnit) -> Vec<AnalyzedClass<'_>> {
        unit.tree
            .classes
            .iter()
            .map(|decl| {
                let info = Self::class_info(decl, &unit.text);
                tracing::debug!(
                    file = %unit.path,
                    class = %info.name,
                    role = info.role.as_str(),
                    methods = decl.methods.len(),
                    "Analyzed class"
                );
                AnalyzedClass {
                    info,
                    named: decl.name.is_some(),
                    decl,
                }
            })
            .collect()
    }

    pub fn class_info(decl: &ClassDecl, text: &str) -> ClassInfo {
        let name = decl
            .name
            .clone()
            .unwrap_or_else(|| ANONYMOUS_CLASS.to_string());

        // Only the first constructor is inspected
        let injected = decl
            .constructors
            .first()
            .map(|ctor| {
                ctor.params
                    .iter()
                    .map(|p| InjectedDependency::new(p.name.clone(), param_type(p, text)))
                    .collect()
            })
            .unwrap_or_default();

        ClassInfo {
            role: RoleTag::from_class_name(&name),
            name,
            decorators: decl
                .decorators
                .iter()
                .map(|d| render_decorator(d, text))
                .collect(),
            injected,
            properties: decl
                .properties
                .iter()
                .map(|p| property_info(p, text))
                .collect(),
        }
    }
}

/// `Name` or `Name(arg, arg)`, arguments verbatim
pub fn render_decorator(decorator: &DecoratorDecl, text: &str) -> String {
    if decorator.arguments.is_empty() {
        return decorator.name.clone();
    }
    let args: Vec<&str> = decorator
        .arguments
        .iter()
        .map(|arg| arg.span.slice(text))
        .collect();
    format!("{}({})", decorator.name, args.join(", "))
}

pub fn param_type(param: &ParamDecl, text: &str) -> String {
    param
        .type_span
        .map(|span| span.slice(text).to_string())
        .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
}

pub fn parameter_details(method: &MethodDecl, text: &str) -> Vec<ParameterDetail> {
    method
        .params
        .iter()
        .map(|p| ParameterDetail {
            name: p.name.clone(),
            type_text: param_type(p, text),
        })
        .collect()
}

pub fn return_type(method: &MethodDecl, text: &str) -> String {
    method
        .return_type
        .map(|span| span.slice(text).to_string())
        .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
}

fn property_info(prop: &PropertyDecl, text: &str) -> PropertyInfo {
    let initializer = prop.initializer.as_ref().map(|e| e.span.slice(text));
    let type_text = match prop.type_span {
        Some(span) => span.slice(text).to_string(),
        None => infer_literal_type(prop, initializer).to_string(),
    };
    PropertyInfo {
        name: prop.name.clone(),
        type_text,
        initializer: initializer.map(str::to_string),
    }
}

fn infer_literal_type(prop: &PropertyDecl, initializer: Option<&str>) -> &'static str {
    let Some(init) = &prop.initializer else {
        return UNKNOWN_TYPE;
    };
    match init.kind {
        ExprKind::StringLiteral(_) | ExprKind::Template => "string",
        _ => match initializer.map(str::trim) {
            Some("true") | Some("false") => "boolean",
            Some(raw) if raw.replace('_', "").parse::<f64>().is_ok() => "number",
            _ => UNKNOWN_TYPE,
        },
    }
}

/// Start of the declaration, widened over leading modifier keywords
pub fn declaration_start(method: &MethodDecl, text: &str) -> usize {
    let mut start = method.start_offset().min(text.len());
    loop {
        let before = text[..start].trim_end();
        let keyword = MODIFIERS.iter().find(|kw| {
            before.ends_with(*kw)
                && before[..before.len() - kw.len()]
                    .chars()
                    .next_back()
                    .map(|c| !(c.is_alphanumeric() || c == '_' || c == '$'))
                    .unwrap_or(true)
        });
        match keyword {
            Some(kw) => start = before.len() - kw.len(),
            None => return start,
        }
    }
}

/// Description of the `/** ... */` block right before the method, `""` if none
pub fn doc_comment(method: &MethodDecl, text: &str) -> String {
    let start = declaration_start(method, text);
    let before = text[..start].trim_end();
    if !before.ends_with("*/") {
        return String::new();
    }
    let Some(inner) = before
        .rfind("/**")
        .and_then(|open| before.get(open + 3..before.len() - 2))
    else {
        return String::new();
    };

    let mut lines = Vec::new();
    for line in inner.lines() {
        let line = line.trim().trim_start_matches('*').trim();
        if line.starts_with('@') {
            break;
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_core::parsers::{SwcProvider, SyntaxProvider};
    use std::path::Path;

    fn unit(source: &str) -> SourceUnit {
        let tree = SwcProvider::new()
            .parse(Path::new("src/app/user.component.ts"), source)
            .unwrap();
        SourceUnit {
            path: "src/app/user.component.ts".into(),
            text: source.to_string(),
            tree,
        }
    }

    const COMPONENT: &str = r#"
@Component({
  selector: 'app-user',
  templateUrl: './user.component.html'
})
export class UserComponent {
  title = 'Users';
  count = 0;
  loaded = false;
  items: User[] = [];
  private apiUrl: string;

  constructor(private userService: UserService, private http: HttpClient) {}

  /**
   * Loads the user list.
   * Second line.
   * @param force reload even when cached
   */
  public async load(force: boolean, page = 1): Promise<void> {
    this.userService.getUsers();
  }

  @HostListener('window:resize', ['$event'])
  onResize(event) {}
}
"#;

    #[test]
    fn derives_class_info() {
        let unit = unit(COMPONENT);
        let classes = ClassAnalyzer::analyze(&unit);
        assert_eq!(classes.len(), 1);
        let info = &classes[0].info;

        assert_eq!(info.name, "UserComponent");
        assert_eq!(info.role, RoleTag::Component);
        assert_eq!(
            info.decorators,
            vec!["Component({\n  selector: 'app-user',\n  templateUrl: './user.component.html'\n})"]
        );
        assert_eq!(
            info.injected,
            vec![
                InjectedDependency::new("userService", "UserService"),
                InjectedDependency::new("http", "HttpClient"),
            ]
        );
    }

    #[test]
    fn infers_property_types_from_literals() {
        let unit = unit(COMPONENT);
        let info = &ClassAnalyzer::analyze(&unit)[0].info;
        let types: Vec<(&str, &str)> = info
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.type_text.as_str()))
            .collect();
        assert_eq!(
            types,
            vec![
                ("title", "string"),
                ("count", "number"),
                ("loaded", "boolean"),
                ("items", "User[]"),
                ("apiUrl", "string"),
            ]
        );
        assert_eq!(info.properties[0].initializer.as_deref(), Some("'Users'"));
        assert_eq!(info.properties[4].initializer, None);
    }

    #[test]
    fn extracts_signature_and_doc() {
        let unit = unit(COMPONENT);
        let class = &ClassAnalyzer::analyze(&unit)[0];
        let load = &class.decl.methods[0];

        assert_eq!(doc_comment(load, &unit.text), "Loads the user list.\nSecond line.");
        assert_eq!(return_type(load, &unit.text), "Promise<void>");
        let params = parameter_details(load, &unit.text);
        assert_eq!(params[0].type_text, "boolean");
        assert_eq!(params[1].name, "page");
        assert_eq!(params[1].type_text, "any");

        let on_resize = &class.decl.methods[1];
        assert_eq!(doc_comment(on_resize, &unit.text), "");
        assert_eq!(return_type(on_resize, &unit.text), "any");
        assert!(unit.text[declaration_start(on_resize, &unit.text)..].starts_with("@HostListener"));
    }

    #[test]
    fn declaration_start_covers_modifiers() {
        let unit = unit(COMPONENT);
        let load = &ClassAnalyzer::analyze(&unit)[0].decl.methods[0];
        assert!(unit.text[declaration_start(load, &unit.text)..].starts_with("public async load"));
    }

    #[test]
    fn anonymous_and_generic_classes() {
        let unit = unit("export default class { run() {} }\nexport class Helper {}");
        let classes = ClassAnalyzer::analyze(&unit);
        assert_eq!(classes[0].info.name, ANONYMOUS_CLASS);
        assert!(!classes[0].named);
        assert_eq!(classes[1].info.role, RoleTag::GenericClass);
        assert!(classes[1].info.injected.is_empty());
    }

    #[test]
    fn decorator_without_arguments_renders_bare_name() {
        let unit = unit("@Injectable()\nexport class AuthService {}");
        assert_eq!(ClassAnalyzer::analyze(&unit)[0].info.decorators, vec!["Injectable"]);
    }
}
