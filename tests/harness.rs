//! Shared AST walking helpers for the integration tests.

use papyrus_parser::ast::{ElseBranch, FunctionStatement, Literal};
use papyrus_parser::{Expr, Program, Span, Stmt};

/// Collect the spans of every node in the program, depth first.
pub fn collect_spans(program: &Program) -> Vec<Span> {
    let mut spans = vec![program.span];
    for stmt in &program.body {
        stmt_spans(stmt, &mut spans);
    }
    spans
}

/// Collect every literal in the program, depth first.
pub fn collect_literals(program: &Program) -> Vec<Literal> {
    let mut literals = Vec::new();
    for stmt in &program.body {
        stmt_literals(stmt, &mut literals);
    }
    literals
}

fn stmt_spans(stmt: &Stmt, out: &mut Vec<Span>) {
    out.push(stmt.span());
    match stmt {
        Stmt::ScriptName(script) => {
            out.push(script.id.span);
            if let Some(extends) = &script.extends {
                out.push(extends.span);
                out.push(extends.extended.span);
            }
        }
        Stmt::Import(import) => out.push(import.id.span),
        Stmt::Property(prop) => {
            out.push(prop.id.span);
            if let Some(init) = &prop.init {
                out.push(init.span);
            }
        }
        Stmt::PropertyFull(prop) => {
            out.push(prop.id.span);
            if let Some(init) = &prop.init {
                out.push(init.span);
            }
            if let Some(getter) = &prop.getter {
                function_spans(getter, out);
            }
            if let Some(setter) = &prop.setter {
                function_spans(setter, out);
            }
        }
        Stmt::Function(func) => function_spans(func, out),
        Stmt::Event(event) => {
            out.push(event.id.span);
            for param in &event.params {
                stmt_spans_variable(param.span, &param.variable.init, out);
            }
            if let Some(body) = &event.body {
                out.push(body.span);
                for child in &body.body {
                    stmt_spans(child, out);
                }
            }
        }
        Stmt::State(state) => {
            out.push(state.id.span);
            out.push(state.body.span);
            for child in &state.body.body {
                stmt_spans(child, out);
            }
        }
        Stmt::If(if_stmt) => if_spans(if_stmt, out),
        Stmt::While(while_stmt) => {
            expr_spans(&while_stmt.test, out);
            out.push(while_stmt.consequent.span);
            for child in &while_stmt.consequent.body {
                stmt_spans(child, out);
            }
        }
        Stmt::Return(ret) => {
            if let Some(argument) = &ret.argument {
                expr_spans(argument, out);
            }
        }
        Stmt::Variable(decl) => stmt_spans_variable(decl.span, &decl.variable.init, out),
        Stmt::Expression(stmt) => expr_spans(&stmt.expression, out),
    }
}

fn if_spans(if_stmt: &papyrus_parser::ast::IfStatement, out: &mut Vec<Span>) {
    expr_spans(&if_stmt.test, out);
    out.push(if_stmt.consequent.span);
    for child in &if_stmt.consequent.body {
        stmt_spans(child, out);
    }
    match &if_stmt.alternate {
        Some(ElseBranch::Block(block)) => {
            out.push(block.span);
            for child in &block.body {
                stmt_spans(child, out);
            }
        }
        Some(ElseBranch::If(chained)) => if_spans(chained, out),
        None => {}
    }
}

fn function_spans(func: &FunctionStatement, out: &mut Vec<Span>) {
    out.push(func.id.span);
    for param in &func.params {
        stmt_spans_variable(param.span, &param.variable.init, out);
    }
    if let Some(body) = &func.body {
        out.push(body.span);
        for child in &body.body {
            stmt_spans(child, out);
        }
    }
}

fn stmt_spans_variable(span: Span, init: &Option<Expr>, out: &mut Vec<Span>) {
    out.push(span);
    if let Some(init) = init {
        expr_spans(init, out);
    }
}

fn expr_spans(expr: &Expr, out: &mut Vec<Span>) {
    out.push(expr.span());
    match expr {
        Expr::Assign(e) => {
            expr_spans(&e.left, out);
            expr_spans(&e.right, out);
        }
        Expr::Binary(e) => {
            expr_spans(&e.left, out);
            expr_spans(&e.right, out);
        }
        Expr::Logical(e) => {
            expr_spans(&e.left, out);
            expr_spans(&e.right, out);
        }
        Expr::Unary(e) => expr_spans(&e.argument, out),
        Expr::Call(e) => {
            expr_spans(&e.callee, out);
            for argument in &e.arguments {
                expr_spans(argument, out);
            }
        }
        Expr::Member(e) => {
            expr_spans(&e.object, out);
            expr_spans(&e.property, out);
        }
        Expr::Cast(e) => {
            expr_spans(&e.id, out);
            out.push(e.kind.span);
        }
        Expr::New(e) => {
            out.push(e.meta.span);
            expr_spans(&e.argument.object, out);
            expr_spans(&e.argument.property, out);
        }
        Expr::Literal(_)
        | Expr::Identifier(_)
        | Expr::SelfRef(_)
        | Expr::Parent(_) => {}
    }
}

fn function_literals(func: &FunctionStatement, out: &mut Vec<Literal>) {
    for param in &func.params {
        if let Some(init) = &param.variable.init {
            expr_literals(init, out);
        }
    }
    if let Some(body) = &func.body {
        for child in &body.body {
            stmt_literals(child, out);
        }
    }
}

fn stmt_literals(stmt: &Stmt, out: &mut Vec<Literal>) {
    match stmt {
        Stmt::ScriptName(_) | Stmt::Import(_) => {}
        Stmt::Property(prop) => {
            if let Some(init) = &prop.init {
                out.push(init.clone());
            }
        }
        Stmt::PropertyFull(prop) => {
            if let Some(init) = &prop.init {
                out.push(init.clone());
            }
            for func in prop.getter.iter().chain(prop.setter.iter()) {
                function_literals(func, out);
            }
        }
        Stmt::Function(func) => function_literals(func, out),
        Stmt::Event(event) => {
            for param in &event.params {
                if let Some(init) = &param.variable.init {
                    expr_literals(init, out);
                }
            }
            if let Some(body) = &event.body {
                for child in &body.body {
                    stmt_literals(child, out);
                }
            }
        }
        Stmt::State(state) => {
            for child in &state.body.body {
                stmt_literals(child, out);
            }
        }
        Stmt::If(if_stmt) => if_literals(if_stmt, out),
        Stmt::While(while_stmt) => {
            expr_literals(&while_stmt.test, out);
            for child in &while_stmt.consequent.body {
                stmt_literals(child, out);
            }
        }
        Stmt::Return(ret) => {
            if let Some(argument) = &ret.argument {
                expr_literals(argument, out);
            }
        }
        Stmt::Variable(decl) => {
            if let Some(init) = &decl.variable.init {
                expr_literals(init, out);
            }
        }
        Stmt::Expression(stmt) => expr_literals(&stmt.expression, out),
    }
}

fn if_literals(if_stmt: &papyrus_parser::ast::IfStatement, out: &mut Vec<Literal>) {
    expr_literals(&if_stmt.test, out);
    for child in &if_stmt.consequent.body {
        stmt_literals(child, out);
    }
    match &if_stmt.alternate {
        Some(ElseBranch::Block(block)) => {
            for child in &block.body {
                stmt_literals(child, out);
            }
        }
        Some(ElseBranch::If(chained)) => if_literals(chained, out),
        None => {}
    }
}

fn expr_literals(expr: &Expr, out: &mut Vec<Literal>) {
    match expr {
        Expr::Literal(lit) => out.push(lit.clone()),
        Expr::Assign(e) => {
            expr_literals(&e.left, out);
            expr_literals(&e.right, out);
        }
        Expr::Binary(e) => {
            expr_literals(&e.left, out);
            expr_literals(&e.right, out);
        }
        Expr::Logical(e) => {
            expr_literals(&e.left, out);
            expr_literals(&e.right, out);
        }
        Expr::Unary(e) => expr_literals(&e.argument, out),
        Expr::Call(e) => {
            expr_literals(&e.callee, out);
            for argument in &e.arguments {
                expr_literals(argument, out);
            }
        }
        Expr::Member(e) => {
            expr_literals(&e.object, out);
            expr_literals(&e.property, out);
        }
        Expr::Cast(e) => expr_literals(&e.id, out),
        Expr::New(e) => {
            expr_literals(&e.argument.object, out);
            expr_literals(&e.argument.property, out);
        }
        Expr::Identifier(_) | Expr::SelfRef(_) | Expr::Parent(_) => {}
    }
}
