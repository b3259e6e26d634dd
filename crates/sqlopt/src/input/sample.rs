/// Report base name used when the built-in sample is analyzed.
pub const SAMPLE_STEM: &str = "sample_procedure";

/// A deliberately inefficient procedure: row-by-row cursor, per-row updates
/// and an artificial delay.
pub const SAMPLE_PROCEDURE: &str = r"CREATE PROCEDURE usp_GetCustomerOrders_Inefficient
    @CustomerId INT,
    @OrderDateThreshold DATETIME = NULL
AS
BEGIN
    SET NOCOUNT ON;

    -- Check if threshold is provided, default if not
    IF @OrderDateThreshold IS NULL
        SET @OrderDateThreshold = '1900-01-01';

    CREATE TABLE #CustomerOrders (
        OrderId INT PRIMARY KEY,
        OrderDate DATETIME,
        TotalAmount DECIMAL(10, 2),
        ItemCount INT
    );

    INSERT INTO #CustomerOrders (OrderId, OrderDate, TotalAmount)
    SELECT OrderId, OrderDate, OrderValue
    FROM Orders
    WHERE CustomerId = @CustomerId AND OrderDate >= @OrderDateThreshold;

    DECLARE @CurrentOrderId INT;
    DECLARE order_cursor CURSOR LOCAL FAST_FORWARD FOR
        SELECT OrderId FROM #CustomerOrders;

    OPEN order_cursor;
    FETCH NEXT FROM order_cursor INTO @CurrentOrderId;

    WHILE @@FETCH_STATUS = 0
    BEGIN
        UPDATE #CustomerOrders
        SET ItemCount = (SELECT COUNT(*) FROM OrderDetails WHERE OrderId = @CurrentOrderId)
        WHERE OrderId = @CurrentOrderId;

        WAITFOR DELAY '00:00:00.010';

        UPDATE Orders SET Status = 'Processing Started' WHERE OrderId = @CurrentOrderId;
        UPDATE Orders SET LastModifiedDate = GETDATE() WHERE OrderId = @CurrentOrderId;

        FETCH NEXT FROM order_cursor INTO @CurrentOrderId;
    END;

    CLOSE order_cursor;
    DEALLOCATE order_cursor;

    SELECT
        c.CustomerName,
        co.OrderId,
        co.OrderDate,
        co.TotalAmount,
        co.ItemCount
    FROM
        #CustomerOrders co
    INNER JOIN Customers c ON c.CustomerId = @CustomerId
    ORDER BY
        co.OrderDate DESC;

    DROP TABLE #CustomerOrders;
END;
GO
";
