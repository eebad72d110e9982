use crate::error::ParseError;
use crate::parsers::syntax::{
    self, Declaration, DeclarationKind, ExprKind, SyntaxProvider, SyntaxTree, TextSpan,
};
use std::path::Path;
use swc_common::{sync::Lrc, BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// TypeScript/JavaScript syntax provider (via swc)
pub struct SwcProvider {
    source_map: Lrc<SourceMap>,
}

impl SwcProvider {
    pub fn new() -> Self {
        Self {
            source_map: Lrc::new(SourceMap::default()),
        }
    }

    fn syntax_for(&self, path: &Path) -> Result<Syntax, ParseError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") => Ok(Syntax::Typescript(TsSyntax {
                decorators: true,
                dts: is_declaration_file(path),
                ..Default::default()
            })),
            Some("tsx") => Ok(Syntax::Typescript(TsSyntax {
                tsx: true,
                decorators: true,
                ..Default::default()
            })),
            Some("js") | Some("mjs") | Some("cjs") | Some("jsx") => Ok(Syntax::Es(EsSyntax {
                jsx: true,
                decorators: true,
                ..Default::default()
            })),
            _ => Err(ParseError::UnsupportedExtension {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parses source code, returning the module and the byte position of its first character.
    ///
    /// A leading byte order mark is not handed to swc; `base` accounts for it.
    fn parse_module(&self, path: &Path, source: &str) -> Result<(Module, i64), ParseError> {
        let syntax = self.syntax_for(path)?;
        let body = source.strip_prefix('\u{feff}').unwrap_or(source);
        let bom_len = (source.len() - body.len()) as i64;
        let file_name: Lrc<FileName> = FileName::Real(path.to_path_buf()).into();
        let fm = self
            .source_map
            .new_source_file(file_name, body.to_string());

        let lexer = Lexer::new(syntax, Default::default(), StringInput::from(&*fm), None);
        let mut parser = Parser::new_from(lexer);

        let module = parser.parse_module().map_err(|e| ParseError::Syntax {
            path: path.to_path_buf(),
            message: format!("{:?}", e),
        })?;
        Ok((module, i64::from(fm.start_pos.0) - bom_len))
    }
}

impl Default for SwcProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxProvider for SwcProvider {
    fn parse(&self, path: &Path, text: &str) -> Result<SyntaxTree, ParseError> {
        let (module, base) = self.parse_module(path, text)?;
        let mut builder = TreeBuilder {
            base,
            text,
            tree: SyntaxTree::default(),
        };
        for item in &module.body {
            builder.module_item(item);
        }
        builder
            .tree
            .declarations
            .sort_by_key(|decl| decl.span.start);
        Ok(builder.tree)
    }
}

fn is_declaration_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(".d.ts"))
        .unwrap_or(false)
}

/// Converts swc positions into offsets of the unit text
#[derive(Clone, Copy)]
struct Offsets<'a> {
    base: i64,
    text: &'a str,
}

impl<'a> Offsets<'a> {
    fn offset(&self, pos: BytePos) -> usize {
        (i64::from(pos.0) - self.base).max(0) as usize
    }

    fn span(&self, span: Span) -> TextSpan {
        TextSpan::new(self.offset(span.lo), self.offset(span.hi))
    }

    fn text_of(&self, span: Span) -> &'a str {
        self.span(span).slice(self.text)
    }

    fn expression(&self, expr: &Expr) -> syntax::Expression {
        let kind = match expr {
            Expr::Lit(Lit::Str(s)) => {
                ExprKind::StringLiteral(s.value.as_str().unwrap_or("").to_string())
            }
            Expr::Tpl(_) => ExprKind::Template,
            Expr::Ident(ident) => ExprKind::Identifier(ident.sym.as_ref().to_string()),
            _ => ExprKind::Other,
        };
        syntax::Expression {
            kind,
            span: self.span(expr.span()),
        }
    }

    fn prop_name(&self, key: &PropName) -> String {
        match key {
            PropName::Ident(ident) => ident.sym.as_ref().to_string(),
            PropName::Str(s) => s.value.as_str().unwrap_or("").to_string(),
            other => self.text_of(other.span()).to_string(),
        }
    }

    fn type_span(&self, type_ann: &Option<Box<TsTypeAnn>>) -> Option<TextSpan> {
        type_ann
            .as_ref()
            .map(|ann| self.span(ann.type_ann.span()))
    }

    fn param_from_pat(&self, pat: &Pat) -> syntax::ParamDecl {
        match pat {
            Pat::Ident(ident) => syntax::ParamDecl {
                name: ident.id.sym.as_ref().to_string(),
                type_span: self.type_span(&ident.type_ann),
            },
            Pat::Assign(assign) => self.param_from_pat(&assign.left),
            Pat::Rest(rest) => {
                let inner = self.param_from_pat(&rest.arg);
                syntax::ParamDecl {
                    name: inner.name,
                    type_span: self.type_span(&rest.type_ann).or(inner.type_span),
                }
            }
            Pat::Array(array) => syntax::ParamDecl {
                name: self.pattern_text(array.span, &array.type_ann),
                type_span: self.type_span(&array.type_ann),
            },
            Pat::Object(object) => syntax::ParamDecl {
                name: self.pattern_text(object.span, &object.type_ann),
                type_span: self.type_span(&object.type_ann),
            },
            other => syntax::ParamDecl {
                name: self.text_of(other.span()).to_string(),
                type_span: None,
            },
        }
    }

    /// Destructuring pattern text without its type annotation
    fn pattern_text(&self, span: Span, type_ann: &Option<Box<TsTypeAnn>>) -> String {
        let full = self.span(span);
        let end = type_ann
            .as_ref()
            .map(|ann| self.span(ann.span).start)
            .unwrap_or(full.end);
        TextSpan::new(full.start, end)
            .slice(self.text)
            .trim()
            .to_string()
    }

    fn decorators(&self, decorators: &[Decorator]) -> Vec<syntax::DecoratorDecl> {
        decorators
            .iter()
            .filter_map(|decorator| {
                let name = decorator_name(decorator.expr.as_ref())?;
                let arguments = match decorator.expr.as_ref() {
                    Expr::Call(call) => call
                        .args
                        .iter()
                        .map(|arg| self.expression(&arg.expr))
                        .collect(),
                    _ => Vec::new(),
                };
                Some(syntax::DecoratorDecl {
                    name,
                    arguments,
                    span: self.span(decorator.span),
                })
            })
            .collect()
    }
}

/// Gets decorator name from an expression: `Injectable`, `ng.Component`, ...
fn decorator_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.as_ref().to_string()),
        Expr::Member(member) => {
            let obj_name = decorator_name(member.obj.as_ref())?;
            let prop_name = match &member.prop {
                MemberProp::Ident(ident) => ident.sym.as_ref().to_string(),
                MemberProp::Computed(_) => return None,
                MemberProp::PrivateName(_) => return None,
            };
            Some(format!("{}.{}", obj_name, prop_name))
        }
        Expr::Call(call) => match &call.callee {
            Callee::Expr(expr) => decorator_name(expr),
            _ => None,
        },
        _ => None,
    }
}

fn accessibility(value: Option<swc_ecma_ast::Accessibility>) -> Option<syntax::Accessibility> {
    value.map(|a| match a {
        swc_ecma_ast::Accessibility::Public => syntax::Accessibility::Public,
        swc_ecma_ast::Accessibility::Protected => syntax::Accessibility::Protected,
        swc_ecma_ast::Accessibility::Private => syntax::Accessibility::Private,
    })
}

/// Builds the facade tree from module items
struct TreeBuilder<'a> {
    base: i64,
    text: &'a str,
    tree: SyntaxTree,
}

impl<'a> TreeBuilder<'a> {
    fn offsets(&self) -> Offsets<'a> {
        Offsets {
            base: self.base,
            text: self.text,
        }
    }

    fn walker(&self) -> Walker<'a> {
        Walker {
            at: self.offsets(),
            calls: Vec::new(),
            locals: Vec::new(),
        }
    }

    fn module_item(&mut self, item: &ModuleItem) {
        match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => self.decl(decl),
            ModuleItem::Stmt(stmt) => {
                let mut walker = self.walker();
                walker.walk_stmt(stmt);
                self.tree.declarations.extend(walker.locals);
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export_decl)) => {
                self.decl(&export_decl.decl)
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export_default)) => {
                match &export_default.decl {
                    DefaultDecl::Class(class_expr) => {
                        let name = class_expr
                            .ident
                            .as_ref()
                            .map(|ident| ident.sym.as_ref().to_string());
                        self.class(name, &class_expr.class);
                    }
                    DefaultDecl::Fn(fn_expr) => {
                        let mut walker = self.walker();
                        walker.walk_function(&fn_expr.function);
                        self.tree.declarations.extend(walker.locals);
                    }
                    _ => {}
                }
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export_expr)) => {
                let mut walker = self.walker();
                walker.walk_expr(&export_expr.expr);
                self.tree.declarations.extend(walker.locals);
            }
            _ => {}
        }
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Class(class_decl) => {
                let name = class_decl.ident.sym.as_ref().to_string();
                self.class(Some(name), &class_decl.class);
            }
            Decl::Var(var_decl) => {
                let at = self.offsets();
                let mut walker = self.walker();
                for declarator in &var_decl.decls {
                    if let Pat::Ident(ident) = &declarator.name {
                        self.tree.declarations.push(Declaration {
                            kind: DeclarationKind::Variable,
                            name: ident.id.sym.as_ref().to_string(),
                            initializer: declarator.init.as_ref().map(|e| at.expression(e)),
                            top_level: true,
                            span: at.span(declarator.span),
                        });
                    }
                    if let Some(init) = &declarator.init {
                        walker.walk_expr(init);
                    }
                }
                self.tree.declarations.extend(walker.locals);
            }
            Decl::Fn(fn_decl) => {
                let mut walker = self.walker();
                walker.walk_function(&fn_decl.function);
                self.tree.declarations.extend(walker.locals);
            }
            _ => {}
        }
    }

    fn class(&mut self, name: Option<String>, class: &Class) {
        let at = self.offsets();
        let mut properties = Vec::new();
        let mut constructors = Vec::new();
        let mut methods = Vec::new();

        for member in &class.body {
            match member {
                ClassMember::Constructor(constructor) => {
                    let params = constructor
                        .params
                        .iter()
                        .map(|param| match param {
                            ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                                TsParamPropParam::Ident(ident) => syntax::ParamDecl {
                                    name: ident.id.sym.as_ref().to_string(),
                                    type_span: at.type_span(&ident.type_ann),
                                },
                                TsParamPropParam::Assign(assign) => at.param_from_pat(&assign.left),
                            },
                            ParamOrTsParamProp::Param(param) => at.param_from_pat(&param.pat),
                        })
                        .collect();
                    constructors.push(syntax::ConstructorDecl { params });

                    if let Some(body) = &constructor.body {
                        let mut walker = self.walker();
                        walker.walk_block(body);
                        self.tree.declarations.extend(walker.locals);
                    }
                }
                ClassMember::Method(method) if method.kind == MethodKind::Method => {
                    let name = at.prop_name(&method.key);
                    methods.push(self.method(
                        name,
                        method.span,
                        &method.function,
                        accessibility(method.accessibility),
                    ));
                }
                ClassMember::PrivateMethod(method) if method.kind == MethodKind::Method => {
                    let name = at.text_of(method.key.span).to_string();
                    methods.push(self.method(
                        name,
                        method.span,
                        &method.function,
                        Some(syntax::Accessibility::Private),
                    ));
                }
                ClassMember::ClassProp(prop) => {
                    let name = at.prop_name(&prop.key);
                    self.property(
                        &mut properties,
                        name,
                        at.type_span(&prop.type_ann),
                        prop.value.as_deref(),
                        prop.span,
                    );
                }
                ClassMember::PrivateProp(prop) => {
                    let name = at.text_of(prop.key.span).to_string();
                    self.property(
                        &mut properties,
                        name,
                        at.type_span(&prop.type_ann),
                        prop.value.as_deref(),
                        prop.span,
                    );
                }
                _ => {}
            }
        }

        self.tree.classes.push(syntax::ClassDecl {
            name,
            span: at.span(class.span),
            decorators: at.decorators(&class.decorators),
            properties,
            constructors,
            methods,
        });
    }

    fn property(
        &mut self,
        properties: &mut Vec<syntax::PropertyDecl>,
        name: String,
        type_span: Option<TextSpan>,
        value: Option<&Expr>,
        span: Span,
    ) {
        let at = self.offsets();
        let initializer = value.map(|e| at.expression(e));
        self.tree.declarations.push(Declaration {
            kind: DeclarationKind::Property,
            name: name.clone(),
            initializer: initializer.clone(),
            top_level: false,
            span: at.span(span),
        });
        if let Some(value) = value {
            let mut walker = self.walker();
            walker.walk_expr(value);
            self.tree.declarations.extend(walker.locals);
        }
        properties.push(syntax::PropertyDecl {
            name,
            type_span,
            initializer,
        });
    }

    fn method(
        &mut self,
        name: String,
        span: Span,
        function: &Function,
        access: Option<syntax::Accessibility>,
    ) -> syntax::MethodDecl {
        let at = self.offsets();
        let mut walker = self.walker();
        if let Some(body) = &function.body {
            walker.walk_block(body);
        }
        self.tree.declarations.extend(walker.locals.iter().cloned());

        syntax::MethodDecl {
            name,
            span: at.span(span),
            decorators: at.decorators(&function.decorators),
            access,
            params: function
                .params
                .iter()
                .map(|param| at.param_from_pat(&param.pat))
                .collect(),
            return_type: at.type_span(&function.return_type),
            body: function.body.as_ref().map(|body| at.span(body.span)),
            calls: walker.calls,
            locals: walker.locals,
        }
    }
}

/// Collects call sites and variable declarations below a function body
struct Walker<'a> {
    at: Offsets<'a>,
    calls: Vec<syntax::CallSite>,
    locals: Vec<Declaration>,
}

impl<'a> Walker<'a> {
    fn walk_function(&mut self, function: &Function) {
        if let Some(body) = &function.body {
            self.walk_block(body);
        }
    }

    fn walk_block(&mut self, block: &BlockStmt) {
        for stmt in &block.stmts {
            self.walk_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.walk_block(block),
            Stmt::Expr(expr_stmt) => self.walk_expr(&expr_stmt.expr),
            Stmt::Return(ret_stmt) => {
                if let Some(arg) = &ret_stmt.arg {
                    self.walk_expr(arg);
                }
            }
            Stmt::If(if_stmt) => {
                self.walk_expr(&if_stmt.test);
                self.walk_stmt(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.walk_stmt(alt);
                }
            }
            Stmt::While(while_stmt) => {
                self.walk_expr(&while_stmt.test);
                self.walk_stmt(&while_stmt.body);
            }
            Stmt::DoWhile(do_while) => {
                self.walk_stmt(&do_while.body);
                self.walk_expr(&do_while.test);
            }
            Stmt::For(for_stmt) => {
                if let Some(init) = &for_stmt.init {
                    match init {
                        VarDeclOrExpr::VarDecl(var_decl) => self.walk_var_decl(var_decl),
                        VarDeclOrExpr::Expr(expr) => self.walk_expr(expr),
                    }
                }
                if let Some(test) = &for_stmt.test {
                    self.walk_expr(test);
                }
                if let Some(update) = &for_stmt.update {
                    self.walk_expr(update);
                }
                self.walk_stmt(&for_stmt.body);
            }
            Stmt::ForIn(for_in) => {
                self.walk_for_head(&for_in.left);
                self.walk_expr(&for_in.right);
                self.walk_stmt(&for_in.body);
            }
            Stmt::ForOf(for_of) => {
                self.walk_for_head(&for_of.left);
                self.walk_expr(&for_of.right);
                self.walk_stmt(&for_of.body);
            }
            Stmt::Switch(switch_stmt) => {
                self.walk_expr(&switch_stmt.discriminant);
                for case in &switch_stmt.cases {
                    if let Some(test) = &case.test {
                        self.walk_expr(test);
                    }
                    for stmt in &case.cons {
                        self.walk_stmt(stmt);
                    }
                }
            }
            Stmt::Try(try_stmt) => {
                self.walk_block(&try_stmt.block);
                if let Some(handler) = &try_stmt.handler {
                    self.walk_block(&handler.body);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.walk_block(finalizer);
                }
            }
            Stmt::Throw(throw_stmt) => self.walk_expr(&throw_stmt.arg),
            Stmt::Labeled(labeled) => self.walk_stmt(&labeled.body),
            Stmt::Decl(Decl::Var(var_decl)) => self.walk_var_decl(var_decl),
            Stmt::Decl(Decl::Fn(fn_decl)) => self.walk_function(&fn_decl.function),
            _ => {}
        }
    }

    fn walk_for_head(&mut self, head: &ForHead) {
        if let ForHead::VarDecl(var_decl) = head {
            self.walk_var_decl(var_decl);
        }
    }

    fn walk_var_decl(&mut self, var_decl: &VarDecl) {
        for declarator in &var_decl.decls {
            if let Pat::Ident(ident) = &declarator.name {
                self.locals.push(Declaration {
                    kind: DeclarationKind::Variable,
                    name: ident.id.sym.as_ref().to_string(),
                    initializer: declarator.init.as_ref().map(|e| self.at.expression(e)),
                    top_level: false,
                    span: self.at.span(declarator.span),
                });
            }
            if let Some(init) = &declarator.init {
                self.walk_expr(init);
            }
        }
    }

    fn record_call(&mut self, callee: &Expr, args: &[ExprOrSpread], span: Span) {
        self.calls.push(syntax::CallSite {
            callee: self.at.span(callee.span()),
            args: args.iter().map(|arg| self.at.expression(&arg.expr)).collect(),
            span: self.at.span(span),
        });
    }

    fn walk_args(&mut self, args: &[ExprOrSpread]) {
        for arg in args {
            self.walk_expr(&arg.expr);
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Call(call_expr) => {
                if let Callee::Expr(callee) = &call_expr.callee {
                    self.record_call(callee, &call_expr.args, call_expr.span);
                    self.walk_expr(callee);
                }
                self.walk_args(&call_expr.args);
            }
            Expr::OptChain(opt_chain) => match opt_chain.base.as_ref() {
                OptChainBase::Call(opt_call) => {
                    self.record_call(&opt_call.callee, &opt_call.args, opt_call.span);
                    self.walk_expr(&opt_call.callee);
                    self.walk_args(&opt_call.args);
                }
                OptChainBase::Member(member) => {
                    self.walk_expr(&member.obj);
                }
            },
            Expr::New(new_expr) => {
                self.walk_expr(&new_expr.callee);
                if let Some(args) = &new_expr.args {
                    self.walk_args(args);
                }
            }
            Expr::Member(member_expr) => {
                self.walk_expr(&member_expr.obj);
                if let MemberProp::Computed(computed) = &member_expr.prop {
                    self.walk_expr(&computed.expr);
                }
            }
            Expr::Bin(bin_expr) => {
                self.walk_expr(&bin_expr.left);
                self.walk_expr(&bin_expr.right);
            }
            Expr::Unary(unary_expr) => self.walk_expr(&unary_expr.arg),
            Expr::Update(update_expr) => self.walk_expr(&update_expr.arg),
            Expr::Assign(assign_expr) => self.walk_expr(&assign_expr.right),
            Expr::Cond(cond_expr) => {
                self.walk_expr(&cond_expr.test);
                self.walk_expr(&cond_expr.cons);
                self.walk_expr(&cond_expr.alt);
            }
            Expr::Paren(paren) => self.walk_expr(&paren.expr),
            Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.walk_expr(expr);
                }
            }
            Expr::Arrow(arrow) => match arrow.body.as_ref() {
                BlockStmtOrExpr::BlockStmt(block) => self.walk_block(block),
                BlockStmtOrExpr::Expr(expr) => self.walk_expr(expr),
            },
            Expr::Fn(fn_expr) => self.walk_function(&fn_expr.function),
            Expr::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.walk_expr(&elem.expr);
                }
            }
            Expr::Object(object) => {
                for prop in &object.props {
                    self.walk_prop(prop);
                }
            }
            Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.walk_expr(expr);
                }
            }
            Expr::TaggedTpl(tagged) => {
                self.walk_expr(&tagged.tag);
                for expr in &tagged.tpl.exprs {
                    self.walk_expr(expr);
                }
            }
            Expr::Await(await_expr) => self.walk_expr(&await_expr.arg),
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.walk_expr(arg);
                }
            }
            Expr::TsAs(ts_as) => self.walk_expr(&ts_as.expr),
            Expr::TsNonNull(non_null) => self.walk_expr(&non_null.expr),
            Expr::TsTypeAssertion(assertion) => self.walk_expr(&assertion.expr),
            Expr::TsConstAssertion(assertion) => self.walk_expr(&assertion.expr),
            Expr::TsSatisfies(satisfies) => self.walk_expr(&satisfies.expr),
            Expr::TsInstantiation(instantiation) => self.walk_expr(&instantiation.expr),
            _ => {}
        }
    }

    fn walk_prop(&mut self, prop: &PropOrSpread) {
        match prop {
            PropOrSpread::Spread(spread) => self.walk_expr(&spread.expr),
            PropOrSpread::Prop(prop) => match prop.as_ref() {
                Prop::KeyValue(kv) => self.walk_expr(&kv.value),
                Prop::Assign(assign) => self.walk_expr(&assign.value),
                Prop::Getter(getter) => {
                    if let Some(body) = &getter.body {
                        self.walk_block(body);
                    }
                }
                Prop::Setter(setter) => {
                    if let Some(body) = &setter.body {
                        self.walk_block(body);
                    }
                }
                Prop::Method(method) => self.walk_function(&method.function),
                Prop::Shorthand(_) => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(source: &str) -> SyntaxTree {
        SwcProvider::new()
            .parse(&PathBuf::from("src/app/user.service.ts"), source)
            .expect("source should parse")
    }

    const SERVICE: &str = r#"
import { Injectable } from '@angular/core';
import { HttpClient } from '@angular/common/http';

export const API_ROOT = 'https://api.example.com';

@Injectable({ providedIn: 'root' })
export class UserService {
  private baseUrl: string = 'https://users.example.com';
  retries = 3;

  constructor(private http: HttpClient, private logger: LoggerService) {}

  /** Loads one user */
  getUser(id: string): Observable<User> {
    const url = '/api/users';
    return this.http.get<User>(`${this.baseUrl}/${id}`).pipe(map((u) => this.logger.log(u)));
  }

  protected save(user: User, notify = true) {
    if (notify) {
      this.logger.info('saving');
    }
  }
}
"#;

    #[test]
    fn extracts_class_shape() {
        let tree = parse(SERVICE);
        assert_eq!(tree.classes.len(), 1);
        let class = &tree.classes[0];
        assert_eq!(class.name.as_deref(), Some("UserService"));
        assert_eq!(class.decorators[0].name, "Injectable");
        assert_eq!(
            class.decorators[0].arguments[0].span.slice(SERVICE),
            "{ providedIn: 'root' }"
        );

        let ctor = &class.constructors[0];
        assert_eq!(ctor.params.len(), 2);
        assert_eq!(ctor.params[0].name, "http");
        assert_eq!(ctor.params[0].type_span.unwrap().slice(SERVICE), "HttpClient");

        assert_eq!(class.properties[0].name, "baseUrl");
        assert_eq!(class.properties[0].type_span.unwrap().slice(SERVICE), "string");
        assert_eq!(class.properties[1].name, "retries");
        assert!(class.properties[1].type_span.is_none());
    }

    #[test]
    fn extracts_methods_with_calls_in_pre_order() {
        let tree = parse(SERVICE);
        let method = &tree.classes[0].methods[0];
        assert_eq!(method.name, "getUser");
        assert_eq!(method.return_type.unwrap().slice(SERVICE), "Observable<User>");
        assert!(method.body_text(SERVICE).contains("const url = '/api/users';"));

        let callees: Vec<&str> = method
            .calls
            .iter()
            .map(|call| call.callee.slice(SERVICE))
            .collect();
        assert_eq!(
            callees,
            vec![
                "this.http.get<User>(`${this.baseUrl}/${id}`).pipe",
                "this.http.get",
                "map",
                "this.logger.log",
            ]
        );
        assert_eq!(method.calls[1].args[0].kind, ExprKind::Template);

        let local = method.local("url").expect("local declaration");
        assert_eq!(
            local.initializer.as_ref().map(|e| e.kind.clone()),
            Some(ExprKind::StringLiteral("/api/users".into()))
        );
    }

    #[test]
    fn records_accessibility_and_params() {
        let tree = parse(SERVICE);
        let save = &tree.classes[0].methods[1];
        assert_eq!(save.access, Some(syntax::Accessibility::Protected));
        assert_eq!(save.params[0].name, "user");
        assert_eq!(save.params[1].name, "notify");
        assert!(tree.classes[0].methods[0].access.is_none());
    }

    #[test]
    fn declarations_are_in_source_order() {
        let tree = parse(SERVICE);
        let names: Vec<&str> = tree.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["API_ROOT", "baseUrl", "retries", "url"]);
        assert!(tree.declarations[0].top_level);
        assert_eq!(tree.top_level_variables().count(), 1);
    }

    #[test]
    fn byte_order_mark_keeps_spans_aligned() {
        let source = "\u{feff}export class Api {\n  constructor(private http: HttpClient) {}\n  load() { return this.http.get('/api/x'); }\n}\n";
        let tree = parse(source);
        let class = &tree.classes[0];
        assert_eq!(class.constructors[0].params[0].type_span.unwrap().slice(source), "HttpClient");
        assert_eq!(class.methods[0].calls[0].callee.slice(source), "this.http.get");
        assert_eq!(class.methods[0].calls[0].args[0].span.slice(source), "'/api/x'");
    }

    #[test]
    fn syntax_errors_are_reported() {
        let result = SwcProvider::new().parse(&PathBuf::from("broken.ts"), "class {{{ ");
        assert!(matches!(result, Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let result = SwcProvider::new().parse(&PathBuf::from("styles.css"), "a {}");
        assert!(matches!(result, Err(ParseError::UnsupportedExtension { .. })));
    }

    #[test]
    fn parses_javascript_units() {
        let source = "export class Api { load() { return fetch('/api/items'); } }";
        let tree = SwcProvider::new()
            .parse(&PathBuf::from("src/api.js"), source)
            .expect("javascript should parse");
        assert_eq!(tree.classes[0].methods[0].calls[0].callee.slice(source), "fetch");
    }
}
