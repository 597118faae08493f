mod new_expense;
