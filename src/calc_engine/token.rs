/// A classified unit of input. Only `Number` carries a payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Add,
    Sub,
    Mul,
    Div,
    LParen,
    RParen,
    End,
    Error,
}

impl Token {
    /// The operator this token stands for, if it is one the evaluator accepts.
    pub fn operator(self) -> Option<Operator> {
        match self {
            Token::Add => Some(Operator::Add),
            Token::Sub => Some(Operator::Sub),
            Token::Mul => Some(Operator::Mul),
            Token::Div => Some(Operator::Div),
            Token::LParen => Some(Operator::LParen),
            Token::RParen => Some(Operator::RParen),
            Token::End => Some(Operator::End),
            Token::Number(_) | Token::Error => None,
        }
    }
}

/// Operator-stack entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    LParen,
    RParen,
    End,
}

impl Operator {
    pub fn category(self) -> Category {
        match self {
            Operator::Add | Operator::Sub => Category::AddSub,
            Operator::Mul | Operator::Div => Category::MulDiv,
            Operator::LParen => Category::LParen,
            Operator::RParen => Category::RParen,
            Operator::End => Category::End,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::LParen => '(',
            Operator::RParen => ')',
            Operator::End => '=',
        }
    }
}

/// Rows and columns of the priority table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    AddSub,
    MulDiv,
    LParen,
    RParen,
    End,
}

impl Category {
    pub(crate) fn index(self) -> usize {
        match self {
            Category::AddSub => 0,
            Category::MulDiv => 1,
            Category::LParen => 2,
            Category::RParen => 3,
            Category::End => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_and_error_tokens_are_not_operators() {
        assert_eq!(Token::Number(1.5).operator(), None);
        assert_eq!(Token::Error.operator(), None);
        assert_eq!(Token::Sub.operator(), Some(Operator::Sub));
    }

    #[test]
    fn operators_share_categories_by_precedence() {
        assert_eq!(Operator::Add.category(), Operator::Sub.category());
        assert_eq!(Operator::Mul.category(), Operator::Div.category());
        assert_ne!(Operator::Add.category(), Operator::Mul.category());
        assert_eq!(Operator::End.category().index(), 4);
    }
}
